use std::path::Path;

use super::loader::load_shader_binary_in;
use super::{shader_directory, ProgramError, ShaderBackend, ShaderLoadError};

/// Vertex stage payload file name inside a backend directory.
pub const VERTEX_SHADER: &str = "vs_cubes.bin";

/// Fragment stage payload file name inside a backend directory.
pub const FRAGMENT_SHADER: &str = "fs_cubes.bin";

/// Vertex + fragment modules loaded for one backend, ready to be linked by
/// [`Renderer::create_program`](crate::render::Renderer::create_program).
#[derive(Debug)]
pub struct ProgramShaders {
    pub backend: ShaderBackend,
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

/// Loads the vertex and fragment payloads for `backend`.
///
/// Both stages are attempted. If either fails, the one that loaded is dropped
/// before returning.
pub fn build_program(device: &wgpu::Device, backend: ShaderBackend) -> Result<ProgramShaders, ProgramError> {
    build_program_in(device, Path::new(""), backend)
}

pub fn build_program_in(
    device: &wgpu::Device,
    base: &Path,
    backend: ShaderBackend,
) -> Result<ProgramShaders, ProgramError> {
    let dir = shader_directory(backend);
    let (vertex, fragment) = load_stage_pair(backend, |file| {
        load_shader_binary_in(device, base, format!("{dir}{file}"))
    })?;

    log::info!("loaded shaders from {dir}");
    Ok(ProgramShaders { backend, vertex, fragment })
}

/// Loads both stages through `load`, releasing a lone success on failure.
fn load_stage_pair<T>(
    backend: ShaderBackend,
    mut load: impl FnMut(&str) -> Result<T, ShaderLoadError>,
) -> Result<(T, T), ProgramError> {
    let vertex = load(VERTEX_SHADER);
    let fragment = load(FRAGMENT_SHADER);

    match (vertex, fragment) {
        (Ok(vs), Ok(fs)) => Ok((vs, fs)),
        (vs, fs) => Err(ProgramError {
            backend,
            vertex: vs.err(),
            fragment: fs.err(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::rc::Rc;

    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn missing(file: &str) -> ShaderLoadError {
        ShaderLoadError::NotFound { relative: PathBuf::from(file) }
    }

    #[test]
    fn both_stages_load() {
        let mut seen = Vec::new();
        let pair = load_stage_pair(ShaderBackend::Spirv, |f| {
            seen.push(f.to_string());
            Ok::<_, ShaderLoadError>(f.len())
        });
        assert!(pair.is_ok());
        assert_eq!(seen, [VERTEX_SHADER, FRAGMENT_SHADER]);
    }

    #[test]
    fn fragment_failure_releases_vertex() {
        let dropped = Rc::new(Cell::new(0));
        let result = load_stage_pair(ShaderBackend::Metal, |f| {
            if f == VERTEX_SHADER { Ok(Tracked(dropped.clone())) } else { Err(missing(f)) }
        });
        let err = result.err().unwrap();
        assert_eq!(dropped.get(), 1);
        assert!(err.vertex.is_none());
        assert!(err.fragment.is_some());
    }

    #[test]
    fn vertex_failure_releases_fragment() {
        let dropped = Rc::new(Cell::new(0));
        let result = load_stage_pair(ShaderBackend::Glsl, |f| {
            if f == FRAGMENT_SHADER { Ok(Tracked(dropped.clone())) } else { Err(missing(f)) }
        });
        assert!(result.is_err());
        assert_eq!(dropped.get(), 1);
    }

    #[test]
    fn shipped_payloads_decode_for_every_backend() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        for backend in ShaderBackend::ALL {
            for file in [VERTEX_SHADER, FRAGMENT_SHADER] {
                let rel = format!("{}{file}", shader_directory(backend));
                let payload = crate::shader::loader::load_payload_in(root, &rel);
                assert!(payload.is_ok(), "{rel}: {:?}", payload.err());
            }
        }
    }

    #[test]
    fn error_names_backend_and_both_stages() {
        let err = load_stage_pair::<()>(ShaderBackend::Dx11, |f| Err(missing(f))).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("dx11"), "{msg}");
        assert!(msg.contains(VERTEX_SHADER) && msg.contains(FRAGMENT_SHADER), "{msg}");
    }
}
