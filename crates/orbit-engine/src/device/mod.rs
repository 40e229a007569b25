//! wgpu device and window surface.
//!
//! [`Gpu`] owns the device, queue and surface; the renderer records into the
//! [`GpuFrame`] it hands out and gives it back for present.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;

pub(crate) use surface::startup_size;
