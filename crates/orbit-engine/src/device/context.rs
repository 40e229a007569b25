use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::math::ClipDepth;
use crate::shader::ShaderBackend;

use super::{GpuFrame, GpuInit, SurfaceErrorAction};
use super::surface;

/// Device, queue and the window surface the programs draw into.
///
/// The surface borrows the window (`'w`), so a `Gpu` never outlives it.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,

    adapter_info: wgpu::AdapterInfo,
    shader_backend: ShaderBackend,
}

impl<'w> Gpu<'w> {
    /// Opens an adapter compatible with `window` and configures its surface at
    /// the current drawable size, or at `fallback` while the window reports a
    /// zero size.
    pub async fn new(window: &'w Window, init: GpuInit, fallback: PhysicalSize<u32>) -> Result<Self> {
        let size = surface::startup_size(window.inner_size(), fallback);
        anyhow::ensure!(
            size.width > 0 && size.height > 0,
            "drawable has zero size ({}x{})",
            size.width,
            size.height
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create surface for window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .with_context(|| format!("no adapter among {:?} can present to this window", init.backends))?;

        let adapter_info = adapter.get_info();
        let shader_backend = ShaderBackend::from_wgpu(adapter_info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("orbit device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .with_context(|| format!("failed to open device on {}", adapter_info.name))?;

        let caps = surface.get_capabilities(&adapter);
        let config = surface::initial_config(&caps, &init, size).context("surface reports no formats")?;
        surface.configure(&device, &config);

        log::info!(
            "{} on {:?}: {:?} {:?} {}x{}, shaders from {}",
            adapter_info.name,
            adapter_info.backend,
            config.format,
            config.present_mode,
            size.width,
            size.height,
            shader_backend.dir_name()
        );

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size,
            adapter_info,
            shader_backend,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Drawable size in physical pixels as last configured.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn backend(&self) -> wgpu::Backend {
        self.adapter_info.backend
    }

    /// Payload directory chosen for [`backend`](Self::backend) at startup.
    pub fn shader_backend(&self) -> ShaderBackend {
        self.shader_backend
    }

    /// wgpu normalizes every backend to a `[0, 1]` depth range.
    pub fn clip_depth(&self) -> ClipDepth {
        ClipDepth::ZeroToOne
    }

    /// Reconfigures the surface for a new drawable size. Zero sizes are
    /// recorded but leave the surface untouched.
    pub fn reset(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(&self.surface, &self.device, &mut self.config, &mut self.size, new_size);
    }

    /// Acquires the next backbuffer along with a fresh encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("orbit backbuffer"),
            ..Default::default()
        });
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("orbit frame"),
        });

        Ok(GpuFrame { surface_texture, view, encoder })
    }

    /// Submits the frame's commands, then presents its backbuffer.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Maps an acquire failure to what the frame loop should do next,
    /// reconfiguring the surface first when that is the remedy.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }
}
