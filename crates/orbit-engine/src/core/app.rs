use winit::event::WindowEvent;

use super::ctx::{FrameCtx, StartCtx, StopCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the programs.
pub trait App {
    /// Called once the window, GPU and renderer exist, before the first frame.
    ///
    /// An error aborts startup: every handle created so far is destroyed and
    /// [`Runtime::run`](crate::window::Runtime::run) returns the error.
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) -> anyhow::Result<()>;

    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per loop iteration.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the loop stops, before the renderer releases what is
    /// left.
    fn on_shutdown(&mut self, ctx: &mut StopCtx<'_, '_>) {
        let _ = ctx;
    }
}
