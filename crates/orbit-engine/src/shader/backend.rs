use std::fmt;

/// Root of the shader payload tree, relative to the search prefixes.
pub const SHADER_ROOT: &str = "assets/shaders";

/// Payload flavour directory selected from the active wgpu backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ShaderBackend {
    #[default]
    Metal,
    Glsl,
    Spirv,
    Dx11,
}

impl ShaderBackend {
    pub const ALL: [ShaderBackend; 4] = [Self::Metal, Self::Glsl, Self::Spirv, Self::Dx11];

    /// Maps a wgpu backend to its payload directory; unknown backends use Metal.
    pub fn from_wgpu(backend: wgpu::Backend) -> Self {
        match backend {
            wgpu::Backend::Metal => Self::Metal,
            wgpu::Backend::Gl => Self::Glsl,
            wgpu::Backend::Vulkan => Self::Spirv,
            wgpu::Backend::Dx12 => Self::Dx11,
            _ => Self::default(),
        }
    }

    /// Directory name under [`SHADER_ROOT`].
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Metal => "metal",
            Self::Glsl => "glsl",
            Self::Spirv => "spirv",
            Self::Dx11 => "dx11",
        }
    }
}

impl fmt::Display for ShaderBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Relative payload directory for `backend`, with a trailing separator.
pub fn shader_directory(backend: ShaderBackend) -> String {
    format!("{SHADER_ROOT}/{}/", backend.dir_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wgpu_backends_map_to_directories() {
        assert_eq!(ShaderBackend::from_wgpu(wgpu::Backend::Metal), ShaderBackend::Metal);
        assert_eq!(ShaderBackend::from_wgpu(wgpu::Backend::Gl), ShaderBackend::Glsl);
        assert_eq!(ShaderBackend::from_wgpu(wgpu::Backend::Vulkan), ShaderBackend::Spirv);
        assert_eq!(ShaderBackend::from_wgpu(wgpu::Backend::Dx12), ShaderBackend::Dx11);
    }

    #[test]
    fn unknown_backend_defaults_to_metal() {
        assert_eq!(ShaderBackend::from_wgpu(wgpu::Backend::BrowserWebGpu), ShaderBackend::Metal);
    }

    #[test]
    fn directories() {
        assert_eq!(shader_directory(ShaderBackend::Metal), "assets/shaders/metal/");
        assert_eq!(shader_directory(ShaderBackend::Glsl), "assets/shaders/glsl/");
        assert_eq!(shader_directory(ShaderBackend::Spirv), "assets/shaders/spirv/");
        assert_eq!(shader_directory(ShaderBackend::Dx11), "assets/shaders/dx11/");
    }
}
