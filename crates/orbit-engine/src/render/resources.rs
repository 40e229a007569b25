use std::collections::HashMap;

use crate::shader::{ProgramShaders, ShaderBackend};

use super::draw::Topology;
use super::handles::{GpuResource, Handle};
use super::vertex::PosColorVertex;

const VERTEX_SIZE: u64 = std::mem::size_of::<PosColorVertex>() as u64;

// ── static vertex buffer ──────────────────────────────────────────────────

/// Immutable vertex buffer, uploaded once at creation.
pub struct VertexBuffer {
    pub(super) buffer: wgpu::Buffer,
    pub(super) vertex_count: u32,
}

impl VertexBuffer {
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

impl GpuResource for VertexBuffer {
    fn destroy(self) {
        self.buffer.destroy();
    }
}

// ── dynamic vertex buffer ─────────────────────────────────────────────────

/// Fixed-capacity vertex buffer overwritten in place between frames.
pub struct DynamicVertexBuffer {
    pub(super) buffer: wgpu::Buffer,
    pub(super) capacity: u32,
    /// Vertices written so far (high-water mark); draws cover `0..len`.
    pub(super) len: u32,
}

impl DynamicVertexBuffer {
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Writes `vertices` starting at vertex `start`. Writes past the capacity
    /// are rejected.
    pub(super) fn update(&mut self, queue: &wgpu::Queue, start: u32, vertices: &[PosColorVertex]) -> bool {
        let Some((offset, end)) = write_range(self.capacity, start, vertices.len()) else {
            log::warn!(
                "dynamic vertex buffer update out of range: {}+{} > {}",
                start,
                vertices.len(),
                self.capacity
            );
            return false;
        };
        if !vertices.is_empty() {
            queue.write_buffer(&self.buffer, offset, bytemuck::cast_slice(vertices));
        }
        self.len = self.len.max(end);
        true
    }
}

impl GpuResource for DynamicVertexBuffer {
    fn destroy(self) {
        self.buffer.destroy();
    }
}

/// Byte offset and end vertex of a write of `count` vertices at `start`, or
/// `None` if it would run past `capacity`.
fn write_range(capacity: u32, start: u32, count: usize) -> Option<(u64, u32)> {
    let count = u32::try_from(count).ok()?;
    let end = start.checked_add(count)?;
    (end <= capacity).then_some((start as u64 * VERTEX_SIZE, end))
}

// ── program ───────────────────────────────────────────────────────────────

/// Linked vertex + fragment shader pair.
///
/// Render pipelines are built lazily per (topology, target format).
pub struct Program {
    shaders: ProgramShaders,
    pipelines: HashMap<(Topology, wgpu::TextureFormat), wgpu::RenderPipeline>,
}

impl Program {
    pub(super) fn new(shaders: ProgramShaders) -> Self {
        Self { shaders, pipelines: HashMap::new() }
    }

    pub fn backend(&self) -> ShaderBackend {
        self.shaders.backend
    }

    pub(super) fn ensure_pipeline(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        format: wgpu::TextureFormat,
        topology: Topology,
    ) {
        if self.pipelines.contains_key(&(topology, format)) {
            return;
        }

        let shaders = &self.shaders;
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("orbit program pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shaders.vertex,
                entry_point: None,
                compilation_options: Default::default(),
                buffers: &[PosColorVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shaders.fragment,
                entry_point: None,
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: topology.to_wgpu(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("built pipeline {:?} for {:?}", topology, format);
        self.pipelines.insert((topology, format), pipeline);
    }

    pub(super) fn pipeline(&self, topology: Topology, format: wgpu::TextureFormat) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&(topology, format))
    }
}

impl GpuResource for Program {
    // Shader modules and pipelines are released on drop.
    fn destroy(self) {}
}

pub type VertexBufferHandle = Handle<VertexBuffer>;
pub type DynamicVertexBufferHandle = Handle<DynamicVertexBuffer>;
pub type ProgramHandle = Handle<Program>;
