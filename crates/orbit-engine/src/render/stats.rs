/// Counters of the last completed frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct FrameStats {
    /// Frames presented so far.
    pub frames: u64,
    /// Draws recorded by the last presented frame.
    pub draw_calls: u32,
    /// Back-buffer size in physical pixels.
    pub width: u32,
    pub height: u32,
}
