//! Font loading for the debug overlay.

mod font;

pub use font::{load_font_from, load_system_font, FontLoadError, MonoFont, SYSTEM_FONT_PATHS};
