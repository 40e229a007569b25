use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::math::{ClipDepth, Mat4, ViewProjection};
use crate::shader::ProgramShaders;
use crate::text;

use super::color::Abgr;
use super::debug_text::{DebugText, DebugTextRenderer, CELL_HEIGHT};
use super::draw::{Draw, VertexSource};
use super::handles::HandleTable;
use super::resources::{
    DynamicVertexBuffer, DynamicVertexBufferHandle, Program, ProgramHandle, VertexBuffer, VertexBufferHandle,
};
use super::stats::FrameStats;
use super::transforms::{TransformRing, TransformUniform};
use super::vertex::PosColorVertex;
use super::{RenderCtx, RenderTarget, Viewport};

/// Result of [`Renderer::frame`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Frame was recorded, submitted and presented.
    Presented,
    /// Surface was lost, outdated or timed out; the queued draws were dropped.
    Skipped,
    /// Surface is unusable; the caller should stop.
    Fatal,
}

/// Viewport rectangle in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct ViewRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Clips the rect to a `target_w`×`target_h` target. `None` if nothing is left.
    pub fn clamp_to(self, target_w: u32, target_h: u32) -> Option<ViewRect> {
        let x = self.x.min(target_w);
        let y = self.y.min(target_h);
        let x2 = self.x.saturating_add(self.width).min(target_w);
        let y2 = self.y.saturating_add(self.height).min(target_h);
        let (w, h) = (x2 - x, y2 - y);
        (w > 0 && h > 0).then_some(ViewRect::new(x, y, w, h))
    }
}

/// State of the single render view.
#[derive(Debug, Copy, Clone)]
struct View {
    clear: Abgr,
    rect: ViewRect,
    view: Mat4,
    proj: Mat4,
}

/// Pixel size of the debug overlay font.
const DEBUG_FONT_PX: f32 = (CELL_HEIGHT - 3) as f32;

/// Thin submission layer over wgpu.
///
/// Owns every buffer and program the application creates, a single view
/// (clear color, rect, view/projection) and the queue of draws for the
/// current frame. [`frame`](Self::frame) records and presents everything
/// queued since the previous call.
pub struct Renderer {
    vertex_buffers: HandleTable<VertexBuffer>,
    dynamic_buffers: HandleTable<DynamicVertexBuffer>,
    programs: HandleTable<Program>,

    pipeline_layout: wgpu::PipelineLayout,
    transforms: TransformRing,
    slots: Vec<TransformUniform>,

    view: View,
    clip_depth: ClipDepth,
    draws: Vec<Draw>,
    stats: FrameStats,

    debug_text: DebugText,
    debug_renderer: Option<DebugTextRenderer>,
}

impl Renderer {
    pub fn new(gpu: &Gpu<'_>) -> Self {
        let device = gpu.device();
        let transforms = TransformRing::new(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orbit program pipeline layout"),
            bind_group_layouts: &[transforms.layout()],
            immediate_size: 0,
        });

        let size = gpu.size();
        Self {
            vertex_buffers: HandleTable::new(),
            dynamic_buffers: HandleTable::new(),
            programs: HandleTable::new(),
            pipeline_layout,
            transforms,
            slots: Vec::new(),
            view: View {
                clear: Abgr::BLACK,
                rect: ViewRect::new(0, 0, size.width, size.height),
                view: Mat4::IDENTITY,
                proj: Mat4::IDENTITY,
            },
            clip_depth: gpu.clip_depth(),
            draws: Vec::new(),
            stats: FrameStats { width: size.width, height: size.height, ..FrameStats::default() },
            debug_text: DebugText::new(),
            debug_renderer: None,
        }
    }

    // ── resources ──────────────────────────────────────────────────────────

    pub fn create_vertex_buffer(&mut self, gpu: &Gpu<'_>, label: &str, vertices: &[PosColorVertex]) -> VertexBufferHandle {
        let buffer = gpu.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let handle = self.vertex_buffers.insert(VertexBuffer { buffer, vertex_count: vertices.len() as u32 });
        log::debug!("created {handle:?} '{label}' ({} vertices)", vertices.len());
        handle
    }

    /// Creates a dynamic buffer holding `initial.len()` vertices, seeded with `initial`.
    pub fn create_dynamic_vertex_buffer(
        &mut self,
        gpu: &Gpu<'_>,
        label: &str,
        initial: &[PosColorVertex],
    ) -> DynamicVertexBufferHandle {
        let buffer = gpu.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(initial),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let count = initial.len() as u32;
        let handle = self.dynamic_buffers.insert(DynamicVertexBuffer { buffer, capacity: count, len: count });
        log::debug!("created {handle:?} '{label}' ({count} vertices)");
        handle
    }

    /// Overwrites vertices of a dynamic buffer from `start_vertex` on.
    ///
    /// Returns `false` for unknown handles and out-of-range writes.
    pub fn update_dynamic_vertex_buffer(
        &mut self,
        gpu: &Gpu<'_>,
        handle: DynamicVertexBufferHandle,
        start_vertex: u32,
        vertices: &[PosColorVertex],
    ) -> bool {
        match self.dynamic_buffers.get_mut(handle) {
            Some(buffer) => buffer.update(gpu.queue(), start_vertex, vertices),
            None => {
                log::warn!("update of unknown {handle:?}");
                false
            }
        }
    }

    pub fn create_program(&mut self, shaders: ProgramShaders) -> ProgramHandle {
        let backend = shaders.backend;
        let handle = self.programs.insert(Program::new(shaders));
        log::debug!("created {handle:?} ({backend})");
        handle
    }

    pub fn destroy_vertex_buffer(&mut self, handle: VertexBufferHandle) -> bool {
        self.vertex_buffers.destroy(handle)
    }

    pub fn destroy_dynamic_vertex_buffer(&mut self, handle: DynamicVertexBufferHandle) -> bool {
        self.dynamic_buffers.destroy(handle)
    }

    pub fn destroy_program(&mut self, handle: ProgramHandle) -> bool {
        self.programs.destroy(handle)
    }

    /// Number of live buffers and programs.
    pub fn live_handles(&self) -> usize {
        self.vertex_buffers.len() + self.dynamic_buffers.len() + self.programs.len()
    }

    // ── view ───────────────────────────────────────────────────────────────

    pub fn set_view_clear(&mut self, color: Abgr) {
        self.view.clear = color;
    }

    pub fn set_view_rect(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.view.rect = ViewRect::new(x, y, width, height);
    }

    pub fn set_view_transform(&mut self, view: Mat4, proj: Mat4) {
        self.view.view = view;
        self.view.proj = proj;
    }

    pub fn view_rect(&self) -> ViewRect {
        self.view.rect
    }

    /// Depth range the projection must target.
    pub fn clip_depth(&self) -> ClipDepth {
        self.clip_depth
    }

    /// Reconfigures the surface for a new drawable size and resets the view
    /// rect to cover it.
    pub fn reset(&mut self, gpu: &mut Gpu<'_>, width: u32, height: u32) {
        gpu.reset(PhysicalSize::new(width, height));
        self.view.rect = ViewRect::new(0, 0, width, height);
    }

    // ── debug text ─────────────────────────────────────────────────────────

    /// Enables the debug overlay. Returns `false` (with a warning) when no
    /// system font could be loaded; printing then has no visible effect.
    pub fn enable_debug_text(&mut self, gpu: &Gpu<'_>) -> bool {
        if self.debug_renderer.is_some() {
            return true;
        }
        match text::load_system_font(DEBUG_FONT_PX) {
            Ok(font) => {
                let size = gpu.size();
                let ctx = RenderCtx::new(
                    gpu.device(),
                    gpu.queue(),
                    gpu.surface_format(),
                    Viewport::new(size.width as f32, size.height as f32),
                );
                self.debug_renderer = Some(DebugTextRenderer::new(&ctx, font));
                true
            }
            Err(err) => {
                log::warn!("debug text disabled: {err}");
                false
            }
        }
    }

    pub fn debug_text_mut(&mut self) -> &mut DebugText {
        &mut self.debug_text
    }

    // ── frame ──────────────────────────────────────────────────────────────

    /// Queues a draw for the next [`frame`](Self::frame).
    pub fn submit(&mut self, draw: Draw) {
        self.draws.push(draw);
    }

    /// Records every queued draw into one pass over the current surface
    /// texture, draws the debug overlay on top, then presents.
    pub fn frame(&mut self, gpu: &mut Gpu<'_>, window: &Window) -> FrameOutcome {
        let mut frame = match gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                self.draws.clear();
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => FrameOutcome::Fatal,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => FrameOutcome::Skipped,
                };
            }
        };

        let device = gpu.device();
        let queue = gpu.queue();
        let format = gpu.surface_format();
        let size = gpu.size();

        self.slots.clear();
        self.slots.extend(self.draws.iter().map(|d| TransformUniform {
            model: d.transform,
            view: self.view.view,
            proj: self.view.proj,
        }));
        self.transforms.upload(device, queue, &self.slots);

        for draw in &self.draws {
            if let Some(program) = self.programs.get_mut(draw.program) {
                program.ensure_pipeline(device, &self.pipeline_layout, format, draw.state.topology);
            }
        }

        let mut draw_calls = 0;
        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("orbit view pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.view.clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(rect) = self.view.rect.clamp_to(size.width, size.height) {
                rpass.set_viewport(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32, 0.0, 1.0);
                rpass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);

                for (slot, draw) in self.draws.iter().enumerate() {
                    let Some(pipeline) = self
                        .programs
                        .get(draw.program)
                        .and_then(|p| p.pipeline(draw.state.topology, format))
                    else {
                        log::warn!("draw with unknown {:?} skipped", draw.program);
                        continue;
                    };

                    let source = match draw.source {
                        VertexSource::Static(h) => self.vertex_buffers.get(h).map(|b| (&b.buffer, b.vertex_count)),
                        VertexSource::Dynamic(h) => self.dynamic_buffers.get(h).map(|b| (&b.buffer, b.len)),
                    };
                    let Some((buffer, count)) = source else {
                        log::warn!("draw with unknown vertex source {:?} skipped", draw.source);
                        continue;
                    };
                    if count == 0 {
                        continue;
                    }

                    rpass.set_pipeline(pipeline);
                    rpass.set_bind_group(0, self.transforms.bind_group(), &[self.transforms.offset(slot)]);
                    rpass.set_vertex_buffer(0, buffer.slice(..));
                    rpass.draw(0..count, 0..1);
                    draw_calls += 1;
                }
            }
        }

        if let Some(overlay) = self.debug_renderer.as_mut()
            && !self.debug_text.is_empty()
        {
            let ctx = RenderCtx::new(device, queue, format, Viewport::new(size.width as f32, size.height as f32));
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            overlay.render(&ctx, &mut target, &self.debug_text);
        }

        window.pre_present_notify();
        gpu.submit(frame);

        self.draws.clear();
        self.stats = FrameStats {
            frames: self.stats.frames + 1,
            draw_calls,
            width: size.width,
            height: size.height,
        };
        FrameOutcome::Presented
    }

    /// Counters of the last presented frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Destroys every live buffer and program. Returns how many were destroyed.
    pub fn shutdown(mut self) -> usize {
        let destroyed =
            self.vertex_buffers.destroy_all() + self.dynamic_buffers.destroy_all() + self.programs.destroy_all();
        self.transforms.destroy();
        if let Some(overlay) = self.debug_renderer.take() {
            overlay.destroy();
        }
        log::info!("renderer shut down ({destroyed} handles released, {} frames)", self.stats.frames);
        destroyed
    }
}

/// Recomputes the view/projection pair for a `width`×`height` drawable and
/// makes it the active view transform.
pub fn update_view_projection(renderer: &mut Renderer, width: u32, height: u32) -> ViewProjection {
    let vp = ViewProjection::for_drawable(width, height, renderer.clip_depth());
    renderer.set_view_transform(vp.view, vp.proj);
    log::debug!("view/projection updated for {width}x{height} (aspect {:.4})", vp.aspect());
    vp
}
