/// How [`Gpu`](super::Gpu) picks its adapter and configures the surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub backends: wgpu::Backends,

    /// Vertex colors are raw 8-bit values; a linear surface shows them as
    /// authored.
    pub prefer_srgb: bool,

    /// `Fifo` blocks present on vsync, which paces the frame loop.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint only.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Restricts adapter selection to `backends`.
    pub fn with_backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pace_on_vsync_with_a_linear_surface() {
        let init = GpuInit::default();
        assert_eq!(init.present_mode, wgpu::PresentMode::Fifo);
        assert!(!init.prefer_srgb);
        assert_eq!(init.backends, wgpu::Backends::all());
    }

    #[test]
    fn with_backends_overrides_selection() {
        let init = GpuInit::default().with_backends(wgpu::Backends::VULKAN);
        assert_eq!(init.backends, wgpu::Backends::VULKAN);
    }
}
