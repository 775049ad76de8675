//! Caret geometry for anchoring the suggestion popup.
//!
//! No caret-geometry API is assumed. [`MirrorLocator`] re-lays out the text
//! before the caret with the field's font metrics and wrapping width, the
//! same way an invisible clone of the field would render it, and reads the
//! end position of that layout. Results are approximate under proportional
//! fonts and are never cached: hosts recompute on every text change, resize
//! and font-affecting style change.
//!
//! Everything sits behind [`CaretLocator`] so a platform that exposes real
//! caret bounds can plug in without touching the composer.

mod metrics;
mod mirror;

pub use metrics::{FontMetrics, GlyphMetrics, MonospaceMetrics};
pub use mirror::{MirrorLocator, TABULATOR_WIDTH};

use std::fmt;

/// A point in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The text field's bounding rectangle in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Reasons a caret position could not be measured
#[derive(Debug, Clone, PartialEq)]
pub enum LocateError {
    /// The field has no usable width (detached, hidden or collapsed)
    NoLayoutWidth { width: f32 },
    /// Caret offset is past the end of the text
    CaretOutOfRange { caret: usize, len: usize },
    /// The font carries no horizontal line metrics
    MissingLineMetrics,
    /// The font could not be loaded
    Font(String),
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLayoutWidth { width } => write!(f, "field has no layout width ({})", width),
            Self::CaretOutOfRange { caret, len } => {
                write!(f, "caret {} is past the end of the text ({} chars)", caret, len)
            }
            Self::MissingLineMetrics => write!(f, "font has no horizontal line metrics"),
            Self::Font(msg) => write!(f, "failed to load font: {}", msg),
        }
    }
}

impl std::error::Error for LocateError {}

/// Measures where the caret renders on screen.
pub trait CaretLocator {
    /// Top-left of the caret for `value[..caret]` inside `bounds`
    fn locate(&self, value: &str, caret: usize, bounds: &Rect) -> Result<Point, LocateError>;

    /// Height of one rendered line, used to place the popup below the caret
    fn line_height(&self) -> f32;
}
