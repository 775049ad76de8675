//! Trigger detection and the suggestion session.
//!
//! - [`scan`] finds an active `@`/`#` span behind the caret
//! - [`SuggestionSession`] tracks one in-progress entry, its candidates,
//!   keyboard selection and the generation used to reject stale responses
//! - [`Candidate`] is what the candidate source returns and what commit inserts

mod candidate;
mod scanner;
mod session;

pub use candidate::{Candidate, HashtagCandidate, MentionCandidate, TriggerType};
pub use scanner::{scan, scan_with_limit, TriggerScan, MAX_QUERY_LEN};
pub use session::{ApplyResult, SessionPhase, SuggestionSession};
