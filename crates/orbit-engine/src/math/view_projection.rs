use super::{ClipDepth, Mat4};

/// View and projection pair for the single scene view.
///
/// The view is always identity; the projection keeps a `[-1, 1]` vertical
/// extent and widens horizontally with the drawable aspect ratio so geometry is
/// never stretched.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewProjection {
    pub view: Mat4,
    pub proj: Mat4,
}

impl ViewProjection {
    /// Computes the pair for a drawable of `width`×`height` physical pixels.
    ///
    /// `height` must be non-zero.
    pub fn for_drawable(width: u32, height: u32, depth: ClipDepth) -> Self {
        let aspect = width as f32 / height as f32;
        Self {
            view: Mat4::IDENTITY,
            proj: Mat4::orthographic_with_depth(-aspect, aspect, -1.0, 1.0, -1.0, 1.0, depth),
        }
    }

    /// Horizontal/vertical aspect ratio encoded in the projection.
    pub fn aspect(&self) -> f32 {
        self.proj.at(1, 1) / self.proj.at(0, 0)
    }
}

impl Default for ViewProjection {
    fn default() -> Self {
        Self { view: Mat4::IDENTITY, proj: Mat4::IDENTITY }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_is_identity() {
        let vp = ViewProjection::for_drawable(1024, 768, ClipDepth::ZeroToOne);
        assert_eq!(vp.view, Mat4::IDENTITY);
    }

    #[test]
    fn scales_for_800_by_600() {
        let vp = ViewProjection::for_drawable(800, 600, ClipDepth::ZeroToOne);
        let aspect = 800.0f32 / 600.0;
        assert!((vp.aspect() - aspect).abs() < 1e-6);
        assert!((vp.proj.at(0, 0) - 1.0 / aspect).abs() < 1e-6);
        assert_eq!(vp.proj.at(1, 1), 1.0);
    }

    #[test]
    fn square_drawable_is_unscaled() {
        let vp = ViewProjection::for_drawable(512, 512, ClipDepth::NegOneToOne);
        assert_eq!(vp.proj.at(0, 0), 1.0);
        assert_eq!(vp.proj.at(1, 1), 1.0);
    }

    #[test]
    fn zero_to_one_keeps_scene_plane_in_range() {
        let vp = ViewProjection::for_drawable(800, 600, ClipDepth::ZeroToOne);
        let z = vp.proj.transform_point([0.0, 0.0, 0.0])[2];
        assert!((0.0..=1.0).contains(&z));
    }
}
