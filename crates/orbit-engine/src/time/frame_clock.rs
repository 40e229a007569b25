/// Frame snapshot handed to [`App::on_frame`](crate::core::App::on_frame).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameTime {
    /// Frames presented before this one. Starts at 0.
    pub frame_index: u32,
}

/// Presented-frame counter that drives the scene animation.
///
/// [`current`](Self::current) reads the index of the frame being built;
/// [`advance`](Self::advance) is called once that frame reached the screen.
/// A frame that is dropped (surface timeout, lost surface) is rebuilt with the
/// same index.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    frame_index: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of presented frames.
    pub fn frame_count(&self) -> u32 {
        self.frame_index
    }

    pub fn current(&self) -> FrameTime {
        FrameTime { frame_index: self.frame_index }
    }

    /// Counts the current frame as presented.
    pub fn advance(&mut self) {
        self.frame_index = self.frame_index.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_zero() {
        let clock = FrameClock::new();
        assert_eq!(clock.current().frame_index, 0);
        assert_eq!(clock.frame_count(), 0);
    }

    #[test]
    fn advance_moves_to_next_frame() {
        let mut clock = FrameClock::new();
        let indices: Vec<u32> = (0..5)
            .map(|_| {
                let i = clock.current().frame_index;
                clock.advance();
                i
            })
            .collect();
        assert_eq!(indices, [0, 1, 2, 3, 4]);
        assert_eq!(clock.frame_count(), 5);
    }

    #[test]
    fn current_is_stable_until_advanced() {
        let mut clock = FrameClock::new();
        clock.advance();
        assert_eq!(clock.current(), clock.current());
        assert_eq!(clock.current().frame_index, 1);
    }

    #[test]
    fn counter_wraps() {
        let mut clock = FrameClock { frame_index: u32::MAX };
        clock.advance();
        assert_eq!(clock.current().frame_index, 0);
    }
}
