//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::source::CandidateRequest;

/// Side effects requested by the composer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Field or popup needs to be redrawn
    Redraw,
    /// Run a candidate query; the result must come back as
    /// `Msg::CandidatesLoaded` carrying the same generation
    QueryCandidates(CandidateRequest),
    /// Recompute the popup anchor (layout changed while the popup is open)
    RepositionPopup,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None | Cmd::QueryCandidates(_) => false,
            Cmd::Redraw | Cmd::RepositionPopup => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Find the candidate request in this command, if any
    pub fn candidate_request(&self) -> Option<&CandidateRequest> {
        match self {
            Cmd::QueryCandidates(request) => Some(request),
            Cmd::Batch(cmds) => cmds.iter().find_map(|c| c.candidate_request()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::TriggerType;

    fn request() -> CandidateRequest {
        CandidateRequest {
            generation: 3,
            trigger: TriggerType::Mention,
            query: "ja".into(),
            limit: 8,
        }
    }

    #[test]
    fn test_needs_redraw() {
        assert!(!Cmd::QueryCandidates(request()).needs_redraw());
        assert!(Cmd::Batch(vec![Cmd::QueryCandidates(request()), Cmd::Redraw]).needs_redraw());
    }

    #[test]
    fn test_candidate_request_in_batch() {
        let cmd = Cmd::Batch(vec![Cmd::Redraw, Cmd::QueryCandidates(request())]);
        assert_eq!(cmd.candidate_request().unwrap().generation, 3);
    }
}
