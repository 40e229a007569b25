//! Transform math shared by the renderer and the demos.
//!
//! Matrices are column-major `[f32; 16]` (element 12..14 holds the translation),
//! matching the WGSL `mat4x4<f32>` upload layout.

mod mat4;
mod view_projection;

pub use mat4::{ClipDepth, Mat4};
pub use view_projection::ViewProjection;
