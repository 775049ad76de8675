//! Editable text owned by the composer.
//!
//! One string and one caret. Only the `Composer` mutates it, through
//! `on_text_change` and `commit`.

mod buffer;

pub use buffer::{char_to_byte, TextBuffer};
