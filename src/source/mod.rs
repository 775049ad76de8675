//! Candidate source boundary.
//!
//! The composer never calls a source directly. It emits
//! `Cmd::QueryCandidates` stamped with the session generation; the host
//! (see [`CandidateDispatcher`]) runs the query and posts the result back as
//! `Msg::CandidatesLoaded`. Ranking is entirely the source's business.

mod dispatcher;
mod memory;

pub use dispatcher::CandidateDispatcher;
pub use memory::MemorySource;

use std::fmt;

use crate::trigger::{Candidate, TriggerType};

/// Errors a candidate source can report.
///
/// The composer treats every variant as "no candidates".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The backing store could not be reached
    Unavailable(String),
    /// The store rejected the query
    Rejected(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "candidate source unavailable: {}", msg),
            Self::Rejected(msg) => write!(f, "candidate query rejected: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

/// A query for candidates, stamped with the generation it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRequest {
    pub generation: u64,
    pub trigger: TriggerType,
    pub query: String,
    pub limit: usize,
}

/// Something that returns ranked, size-bounded candidates for a query.
///
/// Called on every query change; debouncing, if wanted, belongs here.
pub trait CandidateSource: Send + Sync {
    fn query(
        &self,
        trigger: TriggerType,
        text: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>, SourceError>;
}

impl<F> CandidateSource for F
where
    F: Fn(TriggerType, &str, usize) -> Result<Vec<Candidate>, SourceError> + Send + Sync,
{
    fn query(
        &self,
        trigger: TriggerType,
        text: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>, SourceError> {
        self(trigger, text, limit)
    }
}
