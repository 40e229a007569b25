use bytemuck::{Pod, Zeroable};

/// Target depth range of a projection.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClipDepth {
    /// Homogeneous depth in `[-1, 1]` (OpenGL convention).
    NegOneToOne,
    /// Depth in `[0, 1]` (Metal, D3D, Vulkan and wgpu).
    ZeroToOne,
}

/// 4x4 column-major `f32` matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat4(pub [f32; 16]);

impl Mat4 {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, //
    ]);

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Orthographic projection of `[left,right]×[bottom,top]×[znear,zfar]` onto
    /// the homogeneous clip cube `[-1, 1]³`.
    ///
    /// Degenerate bounds (`right == left`, `top == bottom`, `zfar == znear`)
    /// produce non-finite elements.
    #[inline]
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, znear: f32, zfar: f32) -> Self {
        Self::orthographic_with_depth(left, right, bottom, top, znear, zfar, ClipDepth::NegOneToOne)
    }

    /// Orthographic projection with an explicit clip depth range.
    pub fn orthographic_with_depth(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        znear: f32,
        zfar: f32,
        depth: ClipDepth,
    ) -> Self {
        let width = right - left;
        let height = top - bottom;
        let extent = zfar - znear;

        let (zz, zw) = match depth {
            ClipDepth::NegOneToOne => (2.0 / extent, -(zfar + znear) / extent),
            ClipDepth::ZeroToOne => (1.0 / extent, -znear / extent),
        };

        let mut m = [0.0f32; 16];
        m[0] = 2.0 / width;
        m[5] = 2.0 / height;
        m[10] = zz;
        m[12] = -(right + left) / width;
        m[13] = -(top + bottom) / height;
        m[14] = zw;
        m[15] = 1.0;
        Self(m)
    }

    /// Element at `row`, `col`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.0[col * 4 + row]
    }

    /// Matrix product `self * rhs`.
    pub fn mul(&self, rhs: &Mat4) -> Mat4 {
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| self.at(row, k) * rhs.at(k, col)).sum();
            }
        }
        Mat4(out)
    }

    /// Transforms the point `(x, y, z, 1)` and returns the homogeneous result.
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 4] {
        let v = [p[0], p[1], p[2], 1.0];
        let mut out = [0.0f32; 4];
        for (row, o) in out.iter_mut().enumerate() {
            *o = (0..4).map(|k| self.at(row, k) * v[k]).sum();
        }
        out
    }

    #[inline]
    pub fn as_array(&self) -> &[f32; 16] {
        &self.0
    }

    /// Columns as `[[f32; 4]; 4]`.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let m = &self.0;
        [
            [m[0], m[1], m[2], m[3]],
            [m[4], m[5], m[6], m[7]],
            [m[8], m[9], m[10], m[11]],
            [m[12], m[13], m[14], m[15]],
        ]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-6
    }

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn identity_is_exact() {
        let m = Mat4::identity();
        for row in 0..4 {
            for col in 0..4 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_eq!(m.at(row, col), expected);
            }
        }
    }

    #[test]
    fn identity_is_neutral_for_mul() {
        let p = Mat4::orthographic(-2.0, 3.0, -1.0, 4.0, 0.5, 9.0);
        assert_eq!(Mat4::IDENTITY.mul(&p), p);
        assert_eq!(p.mul(&Mat4::IDENTITY), p);
    }

    // ── orthographic ──────────────────────────────────────────────────────

    #[test]
    fn ortho_maps_origin_to_origin() {
        for a in [0.5f32, 1.0, 4.0 / 3.0, 16.0 / 9.0] {
            let m = Mat4::orthographic(-a, a, -1.0, 1.0, -1.0, 1.0);
            let p = m.transform_point([0.0, 0.0, 0.0]);
            assert_eq!(p, [0.0, 0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn ortho_maps_far_corner_to_unit_corner() {
        for a in [0.5f32, 1.0, 4.0 / 3.0, 16.0 / 9.0] {
            let m = Mat4::orthographic(-a, a, -1.0, 1.0, -1.0, 1.0);
            let p = m.transform_point([a, 1.0, 1.0]);
            assert!(approx(p[0], 1.0) && approx(p[1], 1.0) && approx(p[2], 1.0), "{p:?}");
            assert_eq!(p[3], 1.0);
        }
    }

    #[test]
    fn ortho_zero_to_one_depth() {
        let m = Mat4::orthographic_with_depth(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, ClipDepth::ZeroToOne);
        assert!(approx(m.transform_point([0.0, 0.0, -1.0])[2], 0.0));
        assert!(approx(m.transform_point([0.0, 0.0, 0.0])[2], 0.5));
        assert!(approx(m.transform_point([0.0, 0.0, 1.0])[2], 1.0));
    }

    #[test]
    fn ortho_off_center_translation() {
        let m = Mat4::orthographic(0.0, 800.0, 0.0, 600.0, -1.0, 1.0);
        let p = m.transform_point([400.0, 300.0, 0.0]);
        assert!(approx(p[0], 0.0) && approx(p[1], 0.0));
        let p = m.transform_point([0.0, 0.0, 0.0]);
        assert!(approx(p[0], -1.0) && approx(p[1], -1.0));
    }

    #[test]
    fn ortho_degenerate_bounds_are_not_finite() {
        let m = Mat4::orthographic(1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        assert!(!m.0[0].is_finite());
    }

    #[test]
    fn cols_array_matches_storage() {
        let m = Mat4::orthographic(-2.0, 2.0, -1.0, 1.0, -1.0, 1.0);
        let cols = m.to_cols_array_2d();
        assert_eq!(cols[0][0], 0.5);
        assert_eq!(cols[3], [0.0, 0.0, 0.0, 1.0]);
    }
}
