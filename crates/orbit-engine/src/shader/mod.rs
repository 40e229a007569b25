//! Shader payload discovery and loading.
//!
//! Payloads are looked up relative to the working directory under a small set
//! of parent prefixes, so a binary can run from the workspace root or from a
//! nested build directory without any install-time configuration.
//!
//! Payload interface expected by the renderer:
//! - vertex inputs: location 0 `vec3<f32>` position, location 1 `vec4<f32>` color
//! - group 0 binding 0: uniform `{ model, view, proj: mat4x4<f32> }` (dynamic offset)
//! - vertex output location 0 carries the color; fragment writes location 0
//! - one entry point per module

mod backend;
mod error;
mod loader;
mod payload;
mod program;
mod resolve;

pub use backend::{shader_directory, ShaderBackend, SHADER_ROOT};
pub use error::{ProgramError, ShaderLoadError};
pub use loader::{load_shader_binary, read_shader_bytes, read_shader_bytes_in};
pub use payload::ShaderPayload;
pub use program::{build_program, build_program_in, ProgramShaders, FRAGMENT_SHADER, VERTEX_SHADER};
pub use resolve::{resolve_shader_path, resolve_shader_path_in, SEARCH_PREFIXES};
