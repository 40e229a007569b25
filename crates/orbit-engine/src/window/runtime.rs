use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, StartCtx, StopCtx};
use crate::device::{self, Gpu, GpuInit};
use crate::render::{FrameOutcome, Renderer};
use crate::time::FrameClock;

use super::drawable::DrawableTracker;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Enable the debug text overlay.
    pub debug_text: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "orbit".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            debug_text: true,
        }
    }
}

/// Loop state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RunState {
    #[default]
    Running,
    Stopped,
}

impl RunState {
    /// Moves to `Stopped`. Returns `true` only on the first call.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(self, RunState::Stopped) == RunState::Running
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, drives `app` until the window closes or the app asks
    /// to exit, then releases everything in reverse order of creation.
    ///
    /// Returns the startup error if the window, GPU or `App::on_start` failed.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Window and the GPU context bound to it. The surface borrows the window, so
/// it is dropped first.
#[self_referencing]
struct WindowEntry {
    clock: FrameClock,
    drawable: DrawableTracker,
    renderer: Option<Renderer>,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    run_state: RunState,
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            run_state: RunState::Running,
            error: None,
        }
    }

    /// Creates the window, GPU context and renderer, then runs `App::on_start`.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let fallback = self.config.initial_size.to_physical::<u32>(window.scale_factor());
        let initial = device::startup_size(window.inner_size(), fallback);
        let gpu_init = self.gpu_init.clone();

        let mut entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            drawable: DrawableTracker::new(initial),
            renderer: None,
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init, fallback)).context("GPU initialization failed")
            },
        }
        .try_build()?;

        let (app, debug_text) = (&mut self.app, self.config.debug_text);
        entry.with_mut(|fields| {
            let mut renderer = Renderer::new(fields.gpu);
            if debug_text {
                renderer.enable_debug_text(fields.gpu);
            }

            let mut ctx = StartCtx {
                window: fields.window,
                gpu: fields.gpu,
                renderer: &mut renderer,
            };

            match app.on_start(&mut ctx) {
                Ok(()) => {
                    *fields.renderer = Some(renderer);
                    Ok(())
                }
                Err(err) => {
                    let released = renderer.shutdown();
                    log::debug!("startup aborted; released {released} handles");
                    Err(err.context("application startup failed"))
                }
            }
        })?;

        Ok(entry)
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        let app = &mut self.app;

        let control = entry.with_mut(|fields| {
            let Some(renderer) = fields.renderer.as_mut() else {
                return AppControl::Exit;
            };

            let resized = fields.drawable.update(fields.window.inner_size());

            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                renderer,
                time: fields.clock.current(),
                resized,
                outcome: None,
            };
            let control = app.on_frame(&mut ctx);
            advance_on_present(fields.clock, ctx.outcome());
            control
        });

        if control == AppControl::Exit {
            self.stop(event_loop);
        }
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        if self.run_state.stop() {
            log::info!("stopping");
        }
        self.shutdown();
        event_loop.exit();
    }

    /// Lets the app release its handles, destroys what is left, then drops the
    /// GPU context and the window.
    fn shutdown(&mut self) {
        let Some(mut entry) = self.entry.take() else {
            return;
        };

        let app = &mut self.app;
        entry.with_mut(|fields| {
            if let Some(mut renderer) = fields.renderer.take() {
                app.on_shutdown(&mut StopCtx { gpu: fields.gpu, renderer: &mut renderer });
                renderer.shutdown();
            }
        });

        drop(entry);
    }
}

/// Moves the clock past the frame only when it reached the screen; a skipped
/// frame is rebuilt with the same index.
fn advance_on_present(clock: &mut FrameClock, outcome: Option<FrameOutcome>) {
    if outcome == Some(FrameOutcome::Presented) {
        clock.advance();
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.run_state == RunState::Stopped {
            return;
        }

        match self.start(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(err) => {
                self.error = Some(err);
                self.stop(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.run_state == RunState::Stopped {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; present blocks on vsync.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.run_state == RunState::Stopped {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.stop(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.stop(event_loop),

            // The new size is picked up by the drawable poll of the next frame.
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = &self.entry {
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.frame(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.run_state.stop();
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_state_stops_once() {
        let mut state = RunState::default();
        assert_eq!(state, RunState::Running);
        assert!(state.stop());
        assert!(!state.stop());
        assert_eq!(state, RunState::Stopped);
    }

    #[test]
    fn clock_advances_only_on_presented_frames() {
        let mut clock = FrameClock::new();
        advance_on_present(&mut clock, Some(FrameOutcome::Skipped));
        advance_on_present(&mut clock, None);
        assert_eq!(clock.current().frame_index, 0);

        advance_on_present(&mut clock, Some(FrameOutcome::Presented));
        advance_on_present(&mut clock, Some(FrameOutcome::Skipped));
        advance_on_present(&mut clock, Some(FrameOutcome::Fatal));
        advance_on_present(&mut clock, Some(FrameOutcome::Presented));
        assert_eq!(clock.current().frame_index, 2);
    }

    #[test]
    fn default_window_is_800_by_600() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.initial_size, LogicalSize::new(800.0, 600.0));
        assert!(cfg.debug_text);
    }
}
