use bytemuck::{Pod, Zeroable};

/// Packed 32-bit color, `0xAABBGGRR`.
///
/// In memory (little-endian) the bytes read R, G, B, A, which is what the
/// `Unorm8x4` vertex attribute expects.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Pod, Zeroable)]
pub struct Abgr(pub u32);

impl Abgr {
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    pub const BLACK: Self = Self(0xff00_0000);
    pub const WHITE: Self = Self(0xffff_ffff);

    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_le_bytes([r, g, b, a]))
    }

    #[inline]
    pub const fn to_rgba8(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Straight-alpha RGBA in `[0, 1]`.
    pub fn to_rgba_f32(self) -> [f32; 4] {
        self.to_rgba8().map(|c| c as f32 / 255.0)
    }

    /// Premultiplied RGBA in `[0, 1]`, as the overlay blend state expects.
    pub fn to_premul_f32(self) -> [f32; 4] {
        let [r, g, b, a] = self.to_rgba_f32();
        [r * a, g * a, b * a, a]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.to_rgba_f32();
        wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: a as f64 }
    }
}

/// 16-entry debug text palette (ABGR), indexed by attribute nibbles.
pub const PALETTE: [Abgr; 16] = [
    Abgr(0x0000_0000), // black
    Abgr(0xffa4_6534), // blue
    Abgr(0xff06_9a4e), // green
    Abgr(0xff9a_9806), // cyan
    Abgr(0xff00_00cc), // red
    Abgr(0xff7b_5075), // magenta
    Abgr(0xff00_a0c4), // brown
    Abgr(0xffcf_d7d3), // light gray
    Abgr(0xff53_5755), // dark gray
    Abgr(0xffcf_9f72), // light blue
    Abgr(0xff34_e28a), // light green
    Abgr(0xffe2_e234), // light cyan
    Abgr(0xff29_29ef), // light red
    Abgr(0xffa8_7fad), // light magenta
    Abgr(0xff4f_e9fc), // yellow
    Abgr(0xffee_eeec), // white
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order_is_rgba_in_memory() {
        assert_eq!(Abgr(0xff00_00ff).to_rgba8(), [0xff, 0x00, 0x00, 0xff]);
        assert_eq!(Abgr(0xff00_ff00).to_rgba8(), [0x00, 0xff, 0x00, 0xff]);
        assert_eq!(Abgr(0xffff_0000).to_rgba8(), [0x00, 0x00, 0xff, 0xff]);
    }

    #[test]
    fn from_rgba8_round_trips() {
        let c = Abgr::from_rgba8(0x10, 0x20, 0x30, 0x40);
        assert_eq!(c, Abgr(0x4030_2010));
        assert_eq!(c.to_rgba8(), [0x10, 0x20, 0x30, 0x40]);
    }

    #[test]
    fn premultiplies() {
        let [r, g, b, a] = Abgr::from_rgba8(255, 255, 255, 0).to_premul_f32();
        assert_eq!([r, g, b, a], [0.0; 4]);
        let [r, _, _, a] = Abgr::WHITE.to_premul_f32();
        assert_eq!((r, a), (1.0, 1.0));
    }

    #[test]
    fn wgpu_color_is_normalized() {
        let c = Abgr::from_rgba8(0, 51, 255, 255).to_wgpu();
        assert_eq!(c.r, 0.0);
        assert!((c.g - 0.2).abs() < 1e-6);
        assert_eq!((c.b, c.a), (1.0, 1.0));
    }
}
