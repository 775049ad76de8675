//! Message types for the Elm-style architecture
//!
//! Every input the composer reacts to flows through [`Msg`].

use crate::keys::Key;
use crate::source::SourceError;
use crate::trigger::Candidate;

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    /// The field's text or caret changed (typing, paste, IME, caret move)
    TextChanged { value: String, caret: usize },
    /// A key went down in the field
    KeyDown(Key),
    /// A candidate was clicked
    Commit(Candidate),
    /// Commit whatever is highlighted (pointer click on the highlighted row)
    CommitSelected,
    /// Pointer hovered a popup row
    SelectIndex(usize),
    /// Close the popup without touching the text
    Cancel,
    /// A candidate query finished
    CandidatesLoaded {
        generation: u64,
        result: Result<Vec<Candidate>, SourceError>,
    },
    /// Field was resized or a font-affecting style changed
    LayoutChanged,
}

// Convenience constructors for common messages
impl Msg {
    /// Create a text change message
    pub fn text(value: &str, caret: usize) -> Self {
        Msg::TextChanged {
            value: value.to_string(),
            caret,
        }
    }

    /// Create a key message
    pub fn key(key: Key) -> Self {
        Msg::KeyDown(key)
    }
}
