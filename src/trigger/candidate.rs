//! Trigger kinds and the suggestion entries offered for them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The character that opened a suggestion session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// `@name`
    Mention,
    /// `#tag`
    Hashtag,
}

impl TriggerType {
    /// Map a character to the trigger it opens, if any
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '@' => Some(TriggerType::Mention),
            '#' => Some(TriggerType::Hashtag),
            _ => None,
        }
    }

    /// The literal marker character
    pub fn marker(self) -> char {
        match self {
            TriggerType::Mention => '@',
            TriggerType::Hashtag => '#',
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerType::Mention => write!(f, "mention"),
            TriggerType::Hashtag => write!(f, "hashtag"),
        }
    }
}

/// A user that can be mentioned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MentionCandidate {
    pub id: String,
    pub handle: String,
    pub display_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
}

/// A hashtag that can be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashtagCandidate {
    pub tag: String,
    /// Casing shown to the user and inserted on commit (defaults to `tag`)
    #[serde(default)]
    pub display_tag: String,
    #[serde(default)]
    pub use_count: u64,
}

impl HashtagCandidate {
    pub fn new(tag: &str, use_count: u64) -> Self {
        Self {
            tag: tag.to_lowercase(),
            display_tag: tag.to_string(),
            use_count,
        }
    }

    /// `display_tag`, falling back to `tag` when the catalog left it empty
    pub fn shown_tag(&self) -> &str {
        if self.display_tag.is_empty() {
            &self.tag
        } else {
            &self.display_tag
        }
    }
}

/// A single suggestion entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Candidate {
    Mention(MentionCandidate),
    Hashtag(HashtagCandidate),
}

impl Candidate {
    pub fn trigger(&self) -> TriggerType {
        match self {
            Candidate::Mention(_) => TriggerType::Mention,
            Candidate::Hashtag(_) => TriggerType::Hashtag,
        }
    }

    /// Literal text written into the buffer on commit (without the trailing space)
    pub fn marker_text(&self) -> String {
        match self {
            Candidate::Mention(m) => format!("@{}", m.display_label),
            Candidate::Hashtag(h) => format!("#{}", h.shown_tag()),
        }
    }

    /// Label shown in the suggestion popup
    pub fn label(&self) -> &str {
        match self {
            Candidate::Mention(m) => &m.display_label,
            Candidate::Hashtag(h) => h.shown_tag(),
        }
    }
}
