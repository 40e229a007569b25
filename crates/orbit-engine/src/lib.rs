//! Orbit engine crate.
//!
//! Platform + GPU runtime for the orbit programs: a winit window loop, a wgpu
//! device, the shader loader, matrix helpers and a small renderer facade with
//! a debug text overlay.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod math;
pub mod render;
pub mod shader;
pub mod text;
