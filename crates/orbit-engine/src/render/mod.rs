//! GPU rendering facade.
//!
//! [`Renderer`] owns vertex buffers, dynamic vertex buffers and programs
//! behind typed handles, a single view (clear color, rect, view/projection)
//! and the per-frame draw queue. Each [`Renderer::frame`] clears the view,
//! records queued draws, overlays [`DebugText`] and presents.
//!
//! Convention:
//! - Geometry is in clip space; the program applies `proj * view * model`.
//! - Overlay geometry is in physical pixels (top-left origin, +Y down).

mod color;
mod ctx;
mod debug_text;
mod draw;
mod handles;
mod quad;
mod renderer;
mod resources;
mod stats;
mod transforms;
mod vertex;

pub use color::{Abgr, PALETTE};
pub use ctx::{RenderCtx, RenderTarget, Viewport};
pub use debug_text::{DebugText, TextAttr, TextCell, CELL_HEIGHT, CELL_WIDTH};
pub use draw::{Draw, DrawState, Topology, VertexSource};
pub use handles::{GpuResource, Handle, HandleTable};
pub use renderer::{update_view_projection, FrameOutcome, Renderer, ViewRect};
pub use resources::{
    DynamicVertexBuffer, DynamicVertexBufferHandle, Program, ProgramHandle, VertexBuffer, VertexBufferHandle,
};
pub use stats::FrameStats;
pub use transforms::TransformUniform;
pub use vertex::PosColorVertex;
