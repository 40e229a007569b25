use crate::math::Mat4;

use super::handles::Handle;
use super::resources::{DynamicVertexBuffer, Program, VertexBuffer};

/// Primitive assembly for a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Topology {
    #[default]
    Triangles,
    /// One pixel per vertex.
    Points,
}

impl Topology {
    pub fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
            Topology::Points => wgpu::PrimitiveTopology::PointList,
        }
    }
}

/// Fixed-function state of a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct DrawState {
    pub topology: Topology,
}

impl DrawState {
    pub const TRIANGLES: Self = Self { topology: Topology::Triangles };
    pub const POINTS: Self = Self { topology: Topology::Points };
}

/// Vertex data bound by a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexSource {
    Static(Handle<VertexBuffer>),
    Dynamic(Handle<DynamicVertexBuffer>),
}

impl From<Handle<VertexBuffer>> for VertexSource {
    fn from(h: Handle<VertexBuffer>) -> Self {
        VertexSource::Static(h)
    }
}

impl From<Handle<DynamicVertexBuffer>> for VertexSource {
    fn from(h: Handle<DynamicVertexBuffer>) -> Self {
        VertexSource::Dynamic(h)
    }
}

/// A queued draw; consumed by the next [`Renderer::frame`](super::Renderer::frame).
#[derive(Debug, Copy, Clone)]
pub struct Draw {
    pub program: Handle<Program>,
    pub source: VertexSource,
    pub state: DrawState,
    /// Model transform.
    pub transform: Mat4,
}

impl Draw {
    /// Draw with the identity model transform.
    pub fn new(program: Handle<Program>, source: impl Into<VertexSource>, state: DrawState) -> Self {
        Self { program, source: source.into(), state, transform: Mat4::IDENTITY }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topology_maps_to_wgpu() {
        assert_eq!(Topology::Triangles.to_wgpu(), wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(Topology::Points.to_wgpu(), wgpu::PrimitiveTopology::PointList);
    }

    #[test]
    fn default_state_draws_triangles() {
        assert_eq!(DrawState::default(), DrawState::TRIANGLES);
    }
}
