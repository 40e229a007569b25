use std::borrow::Cow;

const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Decoded shader payload, ready to hand to wgpu.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderPayload {
    Wgsl(String),
    SpirV(Vec<u32>),
}

impl ShaderPayload {
    /// Sniffs the SPIR-V magic number (either endianness); anything else must be
    /// UTF-8 WGSL source.
    pub fn decode(bytes: Vec<u8>) -> Result<Self, &'static str> {
        if bytes.len() >= 4 {
            let head = [bytes[0], bytes[1], bytes[2], bytes[3]];
            let swapped = if u32::from_le_bytes(head) == SPIRV_MAGIC {
                Some(false)
            } else if u32::from_be_bytes(head) == SPIRV_MAGIC {
                Some(true)
            } else {
                None
            };

            if let Some(swapped) = swapped {
                if bytes.len() % 4 != 0 {
                    return Err("SPIR-V length is not a multiple of 4");
                }
                let words = bytes
                    .chunks_exact(4)
                    .map(|w| {
                        let w = [w[0], w[1], w[2], w[3]];
                        if swapped { u32::from_be_bytes(w) } else { u32::from_le_bytes(w) }
                    })
                    .collect();
                return Ok(Self::SpirV(words));
            }
        }

        let text = String::from_utf8(bytes).map_err(|_| "neither SPIR-V nor UTF-8 WGSL")?;
        if text.trim().is_empty() {
            return Err("WGSL source is blank");
        }
        Ok(Self::Wgsl(text))
    }

    pub fn to_source(&self) -> wgpu::ShaderSource<'_> {
        match self {
            Self::Wgsl(src) => wgpu::ShaderSource::Wgsl(Cow::Borrowed(src)),
            Self::SpirV(words) => wgpu::ShaderSource::SpirV(Cow::Borrowed(words)),
        }
    }
}
