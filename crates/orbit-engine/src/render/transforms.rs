use bytemuck::{Pod, Zeroable};

use crate::math::Mat4;

/// Per-draw uniform block (group 0, binding 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
}

const UNIFORM_SIZE: u64 = std::mem::size_of::<TransformUniform>() as u64;
const MIN_SLOTS: usize = 16;

pub(super) fn transform_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(UNIFORM_SIZE).expect("TransformUniform has non-zero size by construction")
}

/// Rounds `size` up to a multiple of `align` (a power of two).
pub(super) const fn align_up(size: u64, align: u64) -> u64 {
    (size + align - 1) & !(align - 1)
}

/// Uniform buffer holding one [`TransformUniform`] slot per draw of a frame.
///
/// Slots are `stride` bytes apart so each draw binds its own slot through a
/// dynamic offset. The buffer grows (power of two) and never shrinks.
pub(super) struct TransformRing {
    layout: wgpu::BindGroupLayout,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
}

impl TransformRing {
    pub(super) fn new(device: &wgpu::Device) -> Self {
        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = align_up(UNIFORM_SIZE, align.max(1));

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orbit transform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: Some(transform_ubo_min_binding_size()),
                },
                count: None,
            }],
        });

        let (buffer, bind_group) = Self::allocate(device, &layout, stride, MIN_SLOTS);
        Self { layout, buffer, bind_group, stride, capacity: MIN_SLOTS, staging: Vec::new() }
    }

    pub(super) fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub(super) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Dynamic offset of slot `index`.
    pub(super) fn offset(&self, index: usize) -> u32 {
        (index as u64 * self.stride) as u32
    }

    /// Uploads one slot per entry of `slots`, growing the buffer if needed.
    pub(super) fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, slots: &[TransformUniform]) {
        if slots.is_empty() {
            return;
        }
        if slots.len() > self.capacity {
            let capacity = slots.len().next_power_of_two();
            let (buffer, bind_group) = Self::allocate(device, &self.layout, self.stride, capacity);
            self.buffer.destroy();
            self.buffer = buffer;
            self.bind_group = bind_group;
            self.capacity = capacity;
            log::debug!("transform ring grown to {capacity} slots");
        }

        let stride = self.stride as usize;
        self.staging.clear();
        self.staging.resize(stride * slots.len(), 0);
        for (chunk, slot) in self.staging.chunks_exact_mut(stride).zip(slots) {
            chunk[..UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(slot));
        }
        queue.write_buffer(&self.buffer, 0, &self.staging);
    }

    pub(super) fn destroy(&self) {
        self.buffer.destroy();
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orbit transform ubo"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orbit transform bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: Some(transform_ubo_min_binding_size()),
                }),
            }],
        });

        (buffer, bind_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_three_matrices() {
        assert_eq!(UNIFORM_SIZE, 192);
    }

    #[test]
    fn align_up_rounds_to_boundary() {
        assert_eq!(align_up(192, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(192, 64), 192);
        assert_eq!(align_up(0, 256), 0);
    }
}
