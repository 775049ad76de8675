//! Glyph advance and line height sources for caret measurement.

use std::path::Path;

use fontdue::{Font, FontSettings};

use super::LocateError;

/// Horizontal advance per character and the height of one line.
pub trait GlyphMetrics {
    fn advance(&self, ch: char) -> f32;
    fn line_height(&self) -> f32;
}

/// Fixed-width metrics (every glyph advances by `char_width`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl MonospaceMetrics {
    pub const fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn advance(&self, _ch: char) -> f32 {
        self.char_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// Proportional metrics read from a TrueType/OpenType font via fontdue
pub struct FontMetrics {
    font: Font,
    font_size: f32,
    line_height: f32,
}

impl FontMetrics {
    /// Parse a font and read its line metrics at `font_size` px
    pub fn from_bytes(bytes: &[u8], font_size: f32) -> Result<Self, LocateError> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| LocateError::Font(e.to_string()))?;

        let line_metrics = font
            .horizontal_line_metrics(font_size)
            .ok_or(LocateError::MissingLineMetrics)?;

        Ok(Self {
            font,
            font_size,
            line_height: line_metrics.new_line_size,
        })
    }

    /// Load a font file from disk
    pub fn load(path: &Path, font_size: f32) -> Result<Self, LocateError> {
        let bytes = std::fs::read(path)
            .map_err(|e| LocateError::Font(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&bytes, font_size)
    }
}

impl GlyphMetrics for FontMetrics {
    fn advance(&self, ch: char) -> f32 {
        self.font.metrics(ch, self.font_size).advance_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

impl std::fmt::Debug for FontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetrics")
            .field("font_size", &self.font_size)
            .field("line_height", &self.line_height)
            .finish_non_exhaustive()
    }
}
