//! The composer's text buffer: a plain string plus a caret.
//!
//! All offsets are character offsets (Unicode scalar values). Byte offsets
//! only appear internally when slicing the backing `String`.

use std::ops::Range;

use serde::Serialize;

/// Editable text with a single caret, owned by one `Composer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextBuffer {
    value: String,
    caret: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            caret: 0,
        }
    }

    /// Create a buffer with the caret placed at the end of `s`
    pub fn from_text(s: &str) -> Self {
        Self {
            value: s.to_string(),
            caret: s.chars().count(),
        }
    }

    /// Create a buffer with an explicit caret (clamped to the text length)
    pub fn with_caret(s: &str, caret: usize) -> Self {
        let mut buffer = Self::from_text(s);
        buffer.caret = caret.min(buffer.len_chars());
        buffer
    }

    /// Access the underlying string
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Caret position in characters
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Total length in characters
    pub fn len_chars(&self) -> usize {
        self.value.chars().count()
    }

    /// Replace the whole content, clamping the caret.
    pub fn set(&mut self, value: String, caret: usize) {
        self.value = value;
        self.caret = caret.min(self.len_chars());
    }

    /// Text before the caret
    pub fn before_caret(&self) -> &str {
        &self.value[..self.char_to_byte(self.caret)]
    }

    /// Replace the character range with `text` and move the caret to
    /// `range.start + text.len()` (in characters).
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        let start_byte = self.char_to_byte(range.start);
        let end_byte = self.char_to_byte(range.end.max(range.start));
        self.value.replace_range(start_byte..end_byte, text);
        self.caret = range.start.min(self.len_chars()) + text.chars().count();
        self.caret = self.caret.min(self.len_chars());
    }

    /// Convert char offset to byte offset
    pub fn char_to_byte(&self, char_offset: usize) -> usize {
        char_to_byte(&self.value, char_offset)
    }
}

/// Convert a character offset into a byte offset, saturating at the end.
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
