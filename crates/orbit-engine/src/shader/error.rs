use std::fmt;
use std::io;
use std::path::PathBuf;

use super::ShaderBackend;

/// Error returned by [`load_shader_binary`](super::load_shader_binary).
#[derive(Debug)]
pub enum ShaderLoadError {
    /// No search prefix produced an existing file.
    NotFound { relative: PathBuf },
    /// The file exists but holds no bytes.
    Empty { path: PathBuf },
    /// The read buffer could not be reserved.
    Alloc { path: PathBuf, size: u64 },
    /// Fewer bytes arrived than the file length reported by metadata.
    ShortRead { path: PathBuf, expected: u64, read: u64 },
    Io { path: PathBuf, source: io::Error },
    /// The bytes are neither SPIR-V nor UTF-8 WGSL.
    InvalidPayload { path: PathBuf, reason: &'static str },
}

impl fmt::Display for ShaderLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { relative } => {
                write!(f, "failed to open shader (relative path {})", relative.display())
            }
            Self::Empty { path } => write!(f, "shader file is empty: {}", path.display()),
            Self::Alloc { path, size } => {
                write!(f, "failed to allocate {size} bytes for shader: {}", path.display())
            }
            Self::ShortRead { path, expected, read } => write!(
                f,
                "failed to read shader: {} ({read} of {expected} bytes)",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "failed to read shader: {}: {source}", path.display())
            }
            Self::InvalidPayload { path, reason } => {
                write!(f, "invalid shader payload {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for ShaderLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Error returned by [`build_program`](super::build_program).
///
/// Carries the failure of each stage that did not load.
#[derive(Debug)]
pub struct ProgramError {
    pub backend: ShaderBackend,
    pub vertex: Option<ShaderLoadError>,
    pub fragment: Option<ShaderLoadError>,
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load shaders for backend {}", self.backend)?;
        if let Some(e) = &self.vertex {
            write!(f, "; vertex: {e}")?;
        }
        if let Some(e) = &self.fragment {
            write!(f, "; fragment: {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.vertex
            .as_ref()
            .or(self.fragment.as_ref())
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
