/// Surface texture acquired for one frame, with its view and a fresh encoder.
///
/// Hand it back to [`Gpu::submit`](super::Gpu::submit) in the same loop
/// iteration; the next texture cannot be acquired while this one is held.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
