//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use tagline::source::SourceError;
use tagline::tokenize::EntityDirectory;
use tagline::trigger::{Candidate, HashtagCandidate, MentionCandidate};
use tagline::{Cmd, Composer, Msg};

/// A mention candidate whose id doubles as its handle
pub fn user(id: &str, label: &str) -> MentionCandidate {
    MentionCandidate {
        id: id.to_string(),
        handle: id.to_string(),
        display_label: label.to_string(),
        avatar_ref: None,
    }
}

pub fn mention(id: &str, label: &str) -> Candidate {
    Candidate::Mention(user(id, label))
}

pub fn hashtag(tag: &str) -> Candidate {
    Candidate::Hashtag(HashtagCandidate::new(tag, 1))
}

/// Directory holding the given `(id, label)` users and no hashtags
pub fn directory(users: &[(&str, &str)]) -> EntityDirectory {
    EntityDirectory::new(
        users.iter().map(|(id, label)| user(id, label)).collect(),
        Vec::new(),
    )
}

/// Composer after a single text change
pub fn composer_with(text: &str, caret: usize) -> (Composer, Option<Cmd>) {
    let mut composer = Composer::default();
    let cmd = composer.on_text_change(text, caret);
    (composer, cmd)
}

/// Generation of the query the command asks for
pub fn requested_generation(cmd: &Option<Cmd>) -> u64 {
    cmd.as_ref()
        .and_then(|c| c.candidate_request())
        .map(|r| r.generation)
        .expect("command should carry a candidate query")
}

/// Answer the live session's current query
pub fn populate(composer: &mut Composer, candidates: Vec<Candidate>) -> Option<Cmd> {
    let generation = composer
        .session()
        .map(|s| s.generation)
        .expect("session should be open");
    composer.apply_candidates(generation, Ok(candidates))
}

pub fn loaded(generation: u64, candidates: Vec<Candidate>) -> Msg {
    Msg::CandidatesLoaded {
        generation,
        result: Ok(candidates),
    }
}

pub fn failed(generation: u64) -> Msg {
    Msg::CandidatesLoaded {
        generation,
        result: Err(SourceError::Rejected("test".to_string())),
    }
}
