//! Frame counting.
//!
//! One `FrameClock` per render loop. The counter only moves when a frame is
//! presented, so scene animation never skips ahead over dropped frames.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
