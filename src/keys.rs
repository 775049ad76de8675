//! Keys the composer reacts to.
//!
//! Hosts translate their native key events into [`Key`]; anything the
//! composer does not intercept is passed back for default handling.

use std::fmt;
use std::str::FromStr;

/// A key press delivered to `Composer::on_key_down`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Tab,
    Escape,
    Backspace,
    /// A character key
    Char(char),
    /// Any other named key, passed through untouched
    Other(String),
}

/// What the host should do with a key after the composer saw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed by the popup; suppress the default text insertion
    Handled,
    /// Not ours; run the default behavior
    PassThrough,
}

impl KeyOutcome {
    pub fn prevents_default(self) -> bool {
        matches!(self, KeyOutcome::Handled)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Up => write!(f, "ArrowUp"),
            Key::Down => write!(f, "ArrowDown"),
            Key::Left => write!(f, "ArrowLeft"),
            Key::Right => write!(f, "ArrowRight"),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Escape => write!(f, "Escape"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Char(c) => write!(f, "{}", c),
            Key::Other(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for Key {
    type Err = String;

    /// Parse DOM-style key names (`ArrowDown`, `Enter`, `a`).
    /// Short aliases (`up`, `esc`) are accepted case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(ch));
        }

        let key = match s.to_ascii_lowercase().as_str() {
            "" => return Err("empty key name".to_string()),
            "arrowup" | "up" => Key::Up,
            "arrowdown" | "down" => Key::Down,
            "arrowleft" | "left" => Key::Left,
            "arrowright" | "right" => Key::Right,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "escape" | "esc" => Key::Escape,
            "backspace" => Key::Backspace,
            "space" => Key::Char(' '),
            _ => Key::Other(s.to_string()),
        };
        Ok(key)
    }
}
