//! Directory of known entities used to resolve mentions.
//!
//! The owner may add entities at any time (e.g. as new users are
//! discovered). The tokenizer only reads, and never caches resolutions
//! across calls.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::trigger::{HashtagCandidate, MentionCandidate};

/// Case-insensitive label lookup.
pub trait Directory {
    /// All entities whose display label equals `label`, ignoring case
    fn lookup_by_label(&self, label: &str) -> Vec<MentionCandidate>;
}

/// Errors loading a directory file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// File could not be read
    Io(String),
    /// File is not valid directory YAML
    Parse(String),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "failed to read directory: {}", msg),
            Self::Parse(msg) => write!(f, "failed to parse directory: {}", msg),
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Users and hashtags known to the application.
///
/// Stored as YAML:
///
/// ```yaml
/// users:
///   - { id: u1, handle: jdoe, display_label: Jan Doe }
/// hashtags:
///   - { tag: 9ball, use_count: 12 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDirectory {
    #[serde(default)]
    users: Vec<MentionCandidate>,
    #[serde(default)]
    hashtags: Vec<HashtagCandidate>,
}

/// A directory that its owner keeps mutating while readers tokenize
pub type SharedDirectory = Arc<RwLock<EntityDirectory>>;

impl EntityDirectory {
    pub fn new(users: Vec<MentionCandidate>, hashtags: Vec<HashtagCandidate>) -> Self {
        Self { users, hashtags }
    }

    /// Parse directory YAML
    pub fn from_yaml(content: &str) -> Result<Self, DirectoryError> {
        serde_yaml::from_str(content).map_err(|e| DirectoryError::Parse(e.to_string()))
    }

    /// Load a directory file from disk
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::Io(format!("{}: {}", path.display(), e)))?;
        let directory = Self::from_yaml(&content)?;
        tracing::info!(
            users = directory.users.len(),
            hashtags = directory.hashtags.len(),
            "Loaded directory from {}",
            path.display()
        );
        Ok(directory)
    }

    pub fn users(&self) -> &[MentionCandidate] {
        &self.users
    }

    pub fn hashtags(&self) -> &[HashtagCandidate] {
        &self.hashtags
    }

    pub fn add_user(&mut self, user: MentionCandidate) {
        self.users.push(user);
    }

    pub fn add_hashtag(&mut self, hashtag: HashtagCandidate) {
        self.hashtags.push(hashtag);
    }

    /// Wrap for sharing with concurrent readers
    pub fn into_shared(self) -> SharedDirectory {
        Arc::new(RwLock::new(self))
    }
}

impl Directory for EntityDirectory {
    fn lookup_by_label(&self, label: &str) -> Vec<MentionCandidate> {
        let needle = label.to_lowercase();
        self.users
            .iter()
            .filter(|user| user.display_label.to_lowercase() == needle)
            .cloned()
            .collect()
    }
}

impl<D: Directory> Directory for RwLock<D> {
    fn lookup_by_label(&self, label: &str) -> Vec<MentionCandidate> {
        match self.read() {
            Ok(directory) => directory.lookup_by_label(label),
            Err(poisoned) => poisoned.into_inner().lookup_by_label(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, label: &str) -> MentionCandidate {
        MentionCandidate {
            id: id.into(),
            handle: id.into(),
            display_label: label.into(),
            avatar_ref: None,
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dir = EntityDirectory::new(vec![user("1", "Jan Doe")], vec![]);
        assert_eq!(dir.lookup_by_label("jan doe").len(), 1);
        assert_eq!(dir.lookup_by_label("JAN DOE").len(), 1);
        assert!(dir.lookup_by_label("Jan").is_empty());
    }

    #[test]
    fn test_lookup_returns_all_duplicates() {
        let dir = EntityDirectory::new(vec![user("1", "Sam"), user("2", "sam")], vec![]);
        assert_eq!(dir.lookup_by_label("Sam").len(), 2);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
users:
  - id: u1
    handle: jdoe
    display_label: Jan Doe
hashtags:
  - tag: 9ball
    use_count: 12
"#;
        let dir = EntityDirectory::from_yaml(yaml).unwrap();
        assert_eq!(dir.users().len(), 1);
        assert_eq!(dir.hashtags()[0].use_count, 12);
        assert_eq!(dir.hashtags()[0].shown_tag(), "9ball");
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = EntityDirectory::from_yaml("users: [[[").unwrap_err();
        assert!(matches!(err, DirectoryError::Parse(_)));
    }

    #[test]
    fn test_shared_directory_sees_updates() {
        let shared = EntityDirectory::default().into_shared();
        assert!(shared.lookup_by_label("Jan").is_empty());
        shared.write().unwrap().add_user(user("1", "Jan"));
        assert_eq!(shared.lookup_by_label("Jan").len(), 1);
    }
}
