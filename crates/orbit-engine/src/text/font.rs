use std::fmt;
use std::path::Path;

/// Fonts tried by [`load_system_font`], monospace first.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSansMono-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// Error returned when no usable font could be loaded.
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// A single font rasterized at a fixed pixel size.
pub struct MonoFont {
    font: fontdue::Font,
    px: f32,
    ascent: f32,
}

impl MonoFont {
    /// Parses a TrueType/OpenType font from raw bytes.
    pub fn from_bytes(bytes: &[u8], px: f32) -> Result<Self, FontLoadError> {
        let settings = fontdue::FontSettings { scale: px, ..fontdue::FontSettings::default() };
        let font = fontdue::Font::from_bytes(bytes, settings).map_err(|e| FontLoadError(e.to_string()))?;
        let ascent = font
            .horizontal_line_metrics(px)
            .map_or(px * 0.8, |m| m.ascent);
        Ok(Self { font, px, ascent })
    }

    pub fn px(&self) -> f32 {
        self.px
    }

    /// Distance from the top of a line to the baseline, in pixels.
    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    /// Coverage bitmap of `ch` (one byte per pixel) and its metrics.
    pub fn rasterize(&self, ch: char) -> (fontdue::Metrics, Vec<u8>) {
        self.font.rasterize(ch, self.px)
    }
}

/// Loads the first parseable font in `paths`.
pub fn load_font_from<P: AsRef<Path>>(paths: &[P], px: f32) -> Result<(MonoFont, &Path), FontLoadError> {
    for path in paths.iter().map(AsRef::as_ref) {
        let Ok(bytes) = std::fs::read(path) else { continue };
        match MonoFont::from_bytes(&bytes, px) {
            Ok(font) => return Ok((font, path)),
            Err(err) => log::debug!("skipping font {}: {err}", path.display()),
        }
    }
    Err(FontLoadError(format!("none of {} candidate fonts could be loaded", paths.len())))
}

/// Loads a font for the debug overlay from [`SYSTEM_FONT_PATHS`].
pub fn load_system_font(px: f32) -> Result<MonoFont, FontLoadError> {
    let (font, path) = load_font_from(SYSTEM_FONT_PATHS, px)?;
    log::debug!("debug text font: {}", path.display());
    Ok(font)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fonts_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = [dir.path().join("a.ttf"), dir.path().join("b.ttf")];
        let err = load_font_from(&paths, 13.0).err().unwrap();
        assert!(err.to_string().contains("2 candidate fonts"));
    }

    #[test]
    fn unparseable_fonts_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        assert!(load_font_from(&[bogus], 13.0).is_err());
    }

    #[test]
    fn garbage_bytes_do_not_parse() {
        assert!(MonoFont::from_bytes(&[0u8; 64], 13.0).is_err());
    }
}
