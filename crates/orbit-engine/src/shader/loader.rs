use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{resolve_shader_path_in, ShaderLoadError, ShaderPayload};

/// Locates and reads a shader payload, rooted at the working directory.
pub fn read_shader_bytes(relative: impl AsRef<Path>) -> Result<(PathBuf, Vec<u8>), ShaderLoadError> {
    read_shader_bytes_in(Path::new(""), relative)
}

/// Locates `relative` under `base` (see [`resolve_shader_path_in`]) and reads
/// the whole file.
pub fn read_shader_bytes_in(
    base: &Path,
    relative: impl AsRef<Path>,
) -> Result<(PathBuf, Vec<u8>), ShaderLoadError> {
    let relative = relative.as_ref();
    let path = resolve_shader_path_in(base, relative)
        .ok_or_else(|| ShaderLoadError::NotFound { relative: relative.to_path_buf() })?;

    let mut file = File::open(&path).map_err(|source| ShaderLoadError::Io {
        path: path.clone(),
        source,
    })?;
    let size = file
        .metadata()
        .map_err(|source| ShaderLoadError::Io { path: path.clone(), source })?
        .len();

    if size == 0 {
        return Err(ShaderLoadError::Empty { path });
    }

    let mut data = Vec::new();
    let reserve = usize::try_from(size).ok().and_then(|n| data.try_reserve_exact(n).ok());
    if reserve.is_none() {
        return Err(ShaderLoadError::Alloc { path, size });
    }

    let read = file
        .by_ref()
        .take(size)
        .read_to_end(&mut data)
        .map_err(|source| ShaderLoadError::Io { path: path.clone(), source })? as u64;

    if read != size {
        return Err(ShaderLoadError::ShortRead { path, expected: size, read });
    }

    Ok((path, data))
}

/// Reads and decodes a payload without touching the GPU.
pub(crate) fn load_payload_in(
    base: &Path,
    relative: impl AsRef<Path>,
) -> Result<(PathBuf, ShaderPayload), ShaderLoadError> {
    let (path, bytes) = read_shader_bytes_in(base, relative)?;
    let payload = ShaderPayload::decode(bytes)
        .map_err(|reason| ShaderLoadError::InvalidPayload { path: path.clone(), reason })?;
    Ok((path, payload))
}

/// Loads a shader payload and creates a wgpu shader module from it.
///
/// Every failure is logged once here and returned; nothing is created on error.
pub fn load_shader_binary(
    device: &wgpu::Device,
    relative: impl AsRef<Path>,
) -> Result<wgpu::ShaderModule, ShaderLoadError> {
    load_shader_binary_in(device, Path::new(""), relative)
}

pub(crate) fn load_shader_binary_in(
    device: &wgpu::Device,
    base: &Path,
    relative: impl AsRef<Path>,
) -> Result<wgpu::ShaderModule, ShaderLoadError> {
    let (path, payload) = load_payload_in(base, relative).inspect_err(|e| log::error!("{e}"))?;

    let label = path.to_string_lossy();
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label.as_ref()),
        source: payload.to_source(),
    });

    log::debug!("created shader module from {}", path.display());
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &TempDir, rel: &str, bytes: &[u8]) {
        let path = root.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn reads_whole_file() {
        let root = TempDir::new().unwrap();
        write(&root, "s/vs.bin", b"@vertex fn vs_main() {}");
        let (path, bytes) = read_shader_bytes_in(root.path(), "s/vs.bin").unwrap();
        assert!(path.ends_with("s/vs.bin"));
        assert_eq!(bytes, b"@vertex fn vs_main() {}");
    }

    #[test]
    fn missing_file_is_not_found() {
        let root = TempDir::new().unwrap();
        let err = read_shader_bytes_in(root.path(), "s/vs.bin").unwrap_err();
        assert!(matches!(err, ShaderLoadError::NotFound { .. }), "{err}");
        assert!(err.to_string().contains("s/vs.bin"));
    }

    #[test]
    fn empty_file_is_rejected() {
        let root = TempDir::new().unwrap();
        write(&root, "s/vs.bin", b"");
        let err = read_shader_bytes_in(root.path(), "s/vs.bin").unwrap_err();
        assert!(matches!(err, ShaderLoadError::Empty { .. }), "{err}");
    }

    #[test]
    fn garbage_is_invalid_payload() {
        let root = TempDir::new().unwrap();
        write(&root, "s/fs.bin", &[0xc3, 0x28, 0xa0, 0xa1, 0xff]);
        let err = load_payload_in(root.path(), "s/fs.bin").unwrap_err();
        assert!(matches!(err, ShaderLoadError::InvalidPayload { .. }), "{err}");
    }

    #[test]
    fn wgsl_payload_decodes() {
        let root = TempDir::new().unwrap();
        write(&root, "s/fs.bin", b"@fragment fn fs_main() {}");
        let (_, payload) = load_payload_in(root.path(), "s/fs.bin").unwrap();
        assert!(matches!(payload, ShaderPayload::Wgsl(_)));
    }
}
