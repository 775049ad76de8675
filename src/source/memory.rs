//! In-memory candidate source with fuzzy ranking.

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use super::{CandidateSource, SourceError};
use crate::tokenize::EntityDirectory;
use crate::trigger::{Candidate, HashtagCandidate, MentionCandidate, TriggerType};

/// Candidate source backed by a fixed list of users and hashtags.
///
/// Users are ranked by the better fuzzy score of display label and handle.
/// Hashtags are ranked by fuzzy score, then by use count.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    users: Vec<MentionCandidate>,
    hashtags: Vec<HashtagCandidate>,
}

impl MemorySource {
    pub fn new(users: Vec<MentionCandidate>, hashtags: Vec<HashtagCandidate>) -> Self {
        Self { users, hashtags }
    }

    /// Snapshot the users and hashtags of a directory
    pub fn from_directory(directory: &EntityDirectory) -> Self {
        Self::new(directory.users().to_vec(), directory.hashtags().to_vec())
    }

    fn rank_users(&self, query: &str, limit: usize) -> Vec<Candidate> {
        if query.is_empty() {
            return self
                .users
                .iter()
                .take(limit)
                .cloned()
                .map(Candidate::Mention)
                .collect();
        }

        let mut scorer = Scorer::new(query);
        let mut scored: Vec<(u32, &MentionCandidate)> = self
            .users
            .iter()
            .filter_map(|user| {
                let label = scorer.score(&user.display_label);
                let handle = scorer.score(&user.handle);
                label.max(handle).map(|score| (score, user))
            })
            .collect();

        // Stable sort keeps catalog order for equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, user)| Candidate::Mention(user.clone()))
            .collect()
    }

    fn rank_hashtags(&self, query: &str, limit: usize) -> Vec<Candidate> {
        let mut scored: Vec<(u32, &HashtagCandidate)> = if query.is_empty() {
            self.hashtags.iter().map(|tag| (0, tag)).collect()
        } else {
            let mut scorer = Scorer::new(query);
            self.hashtags
                .iter()
                .filter_map(|tag| scorer.score(tag.shown_tag()).map(|score| (score, tag)))
                .collect()
        };

        scored.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.use_count.cmp(&a.1.use_count)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, tag)| Candidate::Hashtag(tag.clone()))
            .collect()
    }
}

impl CandidateSource for MemorySource {
    fn query(
        &self,
        trigger: TriggerType,
        text: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>, SourceError> {
        let results = match trigger {
            TriggerType::Mention => self.rank_users(text, limit),
            TriggerType::Hashtag => self.rank_hashtags(text, limit),
        };
        tracing::debug!(%trigger, query = text, count = results.len(), "memory source query");
        Ok(results)
    }
}

/// Per-query fuzzy matcher state
struct Scorer {
    matcher: Matcher,
    pattern: Pattern,
    buf: Vec<char>,
}

impl Scorer {
    fn new(query: &str) -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            pattern: Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart),
            buf: Vec::new(),
        }
    }

    fn score(&mut self, haystack: &str) -> Option<u32> {
        self.pattern
            .score(Utf32Str::new(haystack, &mut self.buf), &mut self.matcher)
    }
}
