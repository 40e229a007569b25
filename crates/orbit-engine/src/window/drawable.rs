use winit::dpi::PhysicalSize;

/// Remembers the last non-zero drawable size and reports changes to it.
///
/// Zero-sized reports (minimized windows) are ignored, so the surface is never
/// configured with a zero extent and restoring the window to its previous
/// size is not a change.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawableTracker {
    last: PhysicalSize<u32>,
}

impl DrawableTracker {
    pub fn new(initial: PhysicalSize<u32>) -> Self {
        Self { last: initial }
    }

    pub fn last(&self) -> PhysicalSize<u32> {
        self.last
    }

    /// Returns `Some(size)` when `size` is non-zero and differs from the last
    /// known size.
    pub fn update(&mut self, size: PhysicalSize<u32>) -> Option<PhysicalSize<u32>> {
        if size.width == 0 || size.height == 0 || size == self.last {
            return None;
        }
        self.last = size;
        Some(size)
    }
}
