use bytemuck::{Pod, Zeroable};

use super::Abgr;

/// Position + packed color vertex (16 bytes).
///
///  offset  0  position  [f32; 3]   loc 0  Float32x3
///  offset 12  color     u32 ABGR   loc 1  Unorm8x4
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PosColorVertex {
    pub position: [f32; 3],
    pub color: Abgr,
}

impl PosColorVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Unorm8x4   // color
    ];

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, abgr: u32) -> Self {
        Self { position: [x, y, z], color: Abgr(abgr) }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PosColorVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<PosColorVertex>(), 16);
        assert_eq!(PosColorVertex::layout().array_stride, 16);
    }

    #[test]
    fn color_follows_position() {
        let v = PosColorVertex::new(1.0, 2.0, 3.0, 0xff00_00ff);
        let bytes = bytemuck::bytes_of(&v);
        assert_eq!(&bytes[12..], &[0xff, 0x00, 0x00, 0xff]);
        assert_eq!(PosColorVertex::layout().attributes[1].offset, 12);
    }
}
