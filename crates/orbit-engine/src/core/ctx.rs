use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::Gpu;
use crate::render::{FrameOutcome, Renderer};
use crate::time::FrameTime;

use super::app::AppControl;

/// Context passed to [`App::on_start`](super::App::on_start).
pub struct StartCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub renderer: &'a mut Renderer,
}

impl StartCtx<'_, '_> {
    /// Current drawable size (physical pixels).
    pub fn drawable_size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub renderer: &'a mut Renderer,
    pub time: FrameTime,
    /// New drawable size when it changed since the previous frame.
    pub resized: Option<PhysicalSize<u32>>,
    pub(crate) outcome: Option<FrameOutcome>,
}

impl FrameCtx<'_, '_> {
    /// Reconfigures the surface for `size`.
    pub fn reset(&mut self, size: PhysicalSize<u32>) {
        self.renderer.reset(self.gpu, size.width, size.height);
    }

    /// What [`present`](Self::present) did this frame; `None` before it ran.
    pub fn outcome(&self) -> Option<FrameOutcome> {
        self.outcome
    }

    /// Records the queued draws and presents. Returns `Exit` when the surface
    /// is unusable.
    pub fn present(&mut self) -> AppControl {
        let outcome = self.renderer.frame(self.gpu, self.window);
        self.outcome = Some(outcome);
        match outcome {
            FrameOutcome::Presented | FrameOutcome::Skipped => AppControl::Continue,
            FrameOutcome::Fatal => {
                log::error!("surface lost beyond recovery; stopping");
                AppControl::Exit
            }
        }
    }
}

/// Context passed to [`App::on_shutdown`](super::App::on_shutdown).
pub struct StopCtx<'a, 'w> {
    pub gpu: &'a Gpu<'w>,
    pub renderer: &'a mut Renderer,
}
