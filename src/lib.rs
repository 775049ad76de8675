//! tagline - inline @mention / #hashtag composer
//!
//! Core types and logic for a text field that opens a suggestion popup
//! when the user types `@name` or `#tag`, commits the chosen entity back
//! into the text, and later re-parses stored text into mention and
//! hashtag links. State transitions follow the Elm Architecture: messages
//! in, commands out.

pub mod caret;
pub mod cli;
pub mod commands;
pub mod composer;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod keys;
pub mod messages;
pub mod runtime;
pub mod source;
pub mod tokenize;
pub mod tracing;
pub mod trigger;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use composer::{Composer, ComposerView};
pub use config::ComposerConfig;
pub use messages::Msg;
pub use tokenize::{tokenize, Token, TokenKind};
pub use trigger::{scan, Candidate, TriggerType};
