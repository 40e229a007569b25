//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single Window, and wires them to the
//! GPU layer and the renderer.

mod drawable;
mod runtime;

pub use drawable::DrawableTracker;
pub use runtime::{RunState, Runtime, RuntimeConfig};
