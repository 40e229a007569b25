use anyhow::Context;

use orbit_engine::core::{App, AppControl, FrameCtx, StartCtx, StopCtx};
use orbit_engine::device::Gpu;
use orbit_engine::render::{
    update_view_projection, Draw, DrawState, DynamicVertexBufferHandle, PosColorVertex, ProgramHandle, Renderer,
    VertexBufferHandle,
};
use orbit_engine::shader::build_program;

use crate::scene::{draw_calls_line, frame_line, SceneConfig, STAR, TRIANGLE};

/// Attribute of the frame counter line (red on white).
const FRAME_ATTR: u8 = 0xf4;
/// Attribute of the draw call line (black on white).
const STATS_ATTR: u8 = 0xf0;

// ── resources ─────────────────────────────────────────────────────────────

/// Resource calls the scene makes at startup and shutdown.
trait SceneResources {
    type Buffer: Copy;
    type DynamicBuffer: Copy;
    type Program: Copy;

    fn create_buffer(&mut self, label: &str, vertices: &[PosColorVertex]) -> Self::Buffer;
    fn create_dynamic_buffer(&mut self, label: &str, seed: &[PosColorVertex]) -> Self::DynamicBuffer;
    fn create_program(&mut self) -> anyhow::Result<Self::Program>;

    fn destroy_buffer(&mut self, handle: Self::Buffer) -> bool;
    fn destroy_dynamic_buffer(&mut self, handle: Self::DynamicBuffer) -> bool;
    fn destroy_program(&mut self, handle: Self::Program) -> bool;
}

struct RendererResources<'a, 'w> {
    gpu: &'a Gpu<'w>,
    renderer: &'a mut Renderer,
}

impl SceneResources for RendererResources<'_, '_> {
    type Buffer = VertexBufferHandle;
    type DynamicBuffer = DynamicVertexBufferHandle;
    type Program = ProgramHandle;

    fn create_buffer(&mut self, label: &str, vertices: &[PosColorVertex]) -> VertexBufferHandle {
        self.renderer.create_vertex_buffer(self.gpu, label, vertices)
    }

    fn create_dynamic_buffer(&mut self, label: &str, seed: &[PosColorVertex]) -> DynamicVertexBufferHandle {
        self.renderer.create_dynamic_vertex_buffer(self.gpu, label, seed)
    }

    fn create_program(&mut self) -> anyhow::Result<ProgramHandle> {
        let shaders =
            build_program(self.gpu.device(), self.gpu.shader_backend()).context("failed to create shader program")?;
        Ok(self.renderer.create_program(shaders))
    }

    fn destroy_buffer(&mut self, handle: VertexBufferHandle) -> bool {
        self.renderer.destroy_vertex_buffer(handle)
    }

    fn destroy_dynamic_buffer(&mut self, handle: DynamicVertexBufferHandle) -> bool {
        self.renderer.destroy_dynamic_vertex_buffer(handle)
    }

    fn destroy_program(&mut self, handle: ProgramHandle) -> bool {
        self.renderer.destroy_program(handle)
    }
}

// ── handles ───────────────────────────────────────────────────────────────

/// Handles owned by the scene.
#[derive(Debug)]
struct SceneHandles<B, D, P> {
    program: Option<P>,
    triangle: Option<B>,
    star: Option<B>,
    orbit: Option<D>,
}

impl<B, D, P> Default for SceneHandles<B, D, P> {
    fn default() -> Self {
        Self { program: None, triangle: None, star: None, orbit: None }
    }
}

impl<B: Copy, D: Copy, P: Copy> SceneHandles<B, D, P> {
    /// Creates the configured primitives: triangle, program, star, then orbit.
    ///
    /// Each handle is stored as soon as it exists, so after a failure the
    /// handles already created are still reachable (and owned by the
    /// resource side until it shuts down).
    fn create<R>(&mut self, config: &SceneConfig, res: &mut R) -> anyhow::Result<()>
    where
        R: SceneResources<Buffer = B, DynamicBuffer = D, Program = P>,
    {
        if config.triangle {
            self.triangle = Some(res.create_buffer("triangle", &TRIANGLE));
        }
        self.program = Some(res.create_program()?);
        if config.star {
            self.star = Some(res.create_buffer("star", &[STAR]));
        }
        if config.orbit {
            self.orbit = Some(res.create_dynamic_buffer("orbit", &[config.orbit_seed()]));
        }
        Ok(())
    }

    /// Destroys every held handle and forgets it. Returns how many were destroyed.
    fn release<R>(&mut self, res: &mut R) -> usize
    where
        R: SceneResources<Buffer = B, DynamicBuffer = D, Program = P>,
    {
        let mut destroyed = 0;
        for buffer in [self.triangle.take(), self.star.take()].into_iter().flatten() {
            destroyed += res.destroy_buffer(buffer) as usize;
        }
        if let Some(orbit) = self.orbit.take() {
            destroyed += res.destroy_dynamic_buffer(orbit) as usize;
        }
        if let Some(program) = self.program.take() {
            destroyed += res.destroy_program(program) as usize;
        }
        destroyed
    }
}

// ── app ───────────────────────────────────────────────────────────────────

/// Frame orchestrator shared by the three programs.
pub struct OrbitDemo {
    config: SceneConfig,
    handles: SceneHandles<VertexBufferHandle, DynamicVertexBufferHandle, ProgramHandle>,
}

impl OrbitDemo {
    pub fn new(config: SceneConfig) -> Self {
        Self { config, handles: SceneHandles::default() }
    }
}

impl App for OrbitDemo {
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) -> anyhow::Result<()> {
        let cfg = &self.config;
        {
            let mut res = RendererResources { gpu: &*ctx.gpu, renderer: &mut *ctx.renderer };
            self.handles.create(cfg, &mut res)?;
        }

        let size = ctx.drawable_size();
        ctx.renderer.set_view_clear(cfg.clear_color);
        ctx.renderer.set_view_rect(0, 0, size.width, size.height);
        update_view_projection(ctx.renderer, size.width, size.height);

        log::info!(
            "scene ready: {} ({} shaders, {}x{})",
            cfg.title,
            ctx.gpu.shader_backend(),
            size.width,
            size.height
        );
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Some(size) = ctx.resized {
            ctx.reset(size);
            update_view_projection(ctx.renderer, size.width, size.height);
        }

        let Some(program) = self.handles.program else {
            return AppControl::Exit;
        };
        let frame = ctx.time.frame_index;

        if let Some(orbit) = self.handles.orbit {
            let planet = self.config.orbit_vertex(frame);
            ctx.renderer.update_dynamic_vertex_buffer(ctx.gpu, orbit, 0, &[planet]);
        }

        if let Some(triangle) = self.handles.triangle {
            ctx.renderer.submit(Draw::new(program, triangle, DrawState::TRIANGLES));
        }
        if let Some(star) = self.handles.star {
            ctx.renderer.submit(Draw::new(program, star, DrawState::POINTS));
        }
        if let Some(orbit) = self.handles.orbit {
            ctx.renderer.submit(Draw::new(program, orbit, DrawState::POINTS));
        }

        let draw_calls = ctx.renderer.stats().draw_calls;
        let text = ctx.renderer.debug_text_mut();
        text.clear();
        text.print(0, 1, FRAME_ATTR, frame_line(frame));
        text.print(0, 2, STATS_ATTR, draw_calls_line(draw_calls));

        ctx.present()
    }

    fn on_shutdown(&mut self, ctx: &mut StopCtx<'_, '_>) {
        let mut res = RendererResources { gpu: ctx.gpu, renderer: &mut *ctx.renderer };
        let destroyed = self.handles.release(&mut res);
        log::debug!("scene released {destroyed} handles");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use orbit_engine::render::{GpuResource, Handle, HandleTable};

    use super::*;

    struct Counted(Rc<Cell<usize>>);

    impl GpuResource for Counted {
        fn destroy(self) {
            self.0.set(self.0.get() + 1);
        }
    }

    /// Handle tables shaped like the renderer's, counting destroy calls.
    struct CountingResources {
        buffers: HandleTable<Counted>,
        dynamic: HandleTable<Counted>,
        programs: HandleTable<Counted>,
        destroyed: Rc<Cell<usize>>,
        created: usize,
        program_fails: bool,
    }

    impl CountingResources {
        fn new(program_fails: bool) -> Self {
            Self {
                buffers: HandleTable::new(),
                dynamic: HandleTable::new(),
                programs: HandleTable::new(),
                destroyed: Rc::new(Cell::new(0)),
                created: 0,
                program_fails,
            }
        }

        fn counted(&mut self) -> Counted {
            self.created += 1;
            Counted(Rc::clone(&self.destroyed))
        }

        /// Same teardown as `Renderer::shutdown`.
        fn shutdown(&mut self) -> usize {
            self.buffers.destroy_all() + self.dynamic.destroy_all() + self.programs.destroy_all()
        }
    }

    impl SceneResources for CountingResources {
        type Buffer = Handle<Counted>;
        type DynamicBuffer = Handle<Counted>;
        type Program = Handle<Counted>;

        fn create_buffer(&mut self, _label: &str, _vertices: &[PosColorVertex]) -> Handle<Counted> {
            let r = self.counted();
            self.buffers.insert(r)
        }

        fn create_dynamic_buffer(&mut self, _label: &str, _seed: &[PosColorVertex]) -> Handle<Counted> {
            let r = self.counted();
            self.dynamic.insert(r)
        }

        fn create_program(&mut self) -> anyhow::Result<Handle<Counted>> {
            if self.program_fails {
                anyhow::bail!("vs_cubes.bin: no such shader");
            }
            let r = self.counted();
            Ok(self.programs.insert(r))
        }

        fn destroy_buffer(&mut self, handle: Handle<Counted>) -> bool {
            self.buffers.destroy(handle)
        }

        fn destroy_dynamic_buffer(&mut self, handle: Handle<Counted>) -> bool {
            self.dynamic.destroy(handle)
        }

        fn destroy_program(&mut self, handle: Handle<Counted>) -> bool {
            self.programs.destroy(handle)
        }
    }

    type Handles = SceneHandles<Handle<Counted>, Handle<Counted>, Handle<Counted>>;

    // ── normal close ───────────────────────────────────────────────────────

    #[test]
    fn solar_close_destroys_each_handle_once() {
        let mut res = CountingResources::new(false);
        let mut handles = Handles::default();
        handles.create(&SceneConfig::solar(), &mut res).unwrap();
        assert_eq!(res.created, 4);

        assert_eq!(handles.release(&mut res), 4);
        assert_eq!(res.shutdown(), 0);
        assert_eq!(res.destroyed.get(), 4);
    }

    #[test]
    fn release_twice_destroys_nothing_more() {
        let mut res = CountingResources::new(false);
        let mut handles = Handles::default();
        handles.create(&SceneConfig::orbit(), &mut res).unwrap();

        assert_eq!(handles.release(&mut res), 3);
        assert_eq!(handles.release(&mut res), 0);
        assert_eq!(res.destroyed.get(), 3);
    }

    #[test]
    fn triangle_variant_owns_buffer_and_program() {
        let mut res = CountingResources::new(false);
        let mut handles = Handles::default();
        handles.create(&SceneConfig::triangle(), &mut res).unwrap();
        assert!(handles.star.is_none() && handles.orbit.is_none());
        assert_eq!(handles.release(&mut res), 2);
    }

    // ── startup failure ────────────────────────────────────────────────────

    #[test]
    fn program_failure_leaves_created_handles_to_shutdown() {
        let mut res = CountingResources::new(true);
        let mut handles = Handles::default();
        let err = handles.create(&SceneConfig::solar(), &mut res).unwrap_err();
        assert!(err.to_string().contains("vs_cubes.bin"));

        // Triangle exists, nothing after the program was attempted.
        assert!(handles.triangle.is_some());
        assert!(handles.program.is_none() && handles.star.is_none() && handles.orbit.is_none());

        assert_eq!(res.shutdown(), res.created);
        assert_eq!(res.destroyed.get(), 1);
    }

    #[test]
    fn program_failure_before_any_buffer_destroys_nothing() {
        let mut res = CountingResources::new(true);
        let mut handles = Handles::default();
        assert!(handles.create(&SceneConfig::orbit(), &mut res).is_err());
        assert_eq!(res.created, 0);
        assert_eq!(res.shutdown(), 0);
    }
}
