//! Suggestion session state machine.
//!
//! ```text
//! Idle ──scan hit──▶ Triggered ──fresh non-empty result──▶ Populated
//!   ▲                  │  ▲                                    │
//!   │                  └──┘ query edit (new generation)        │
//!   └──── Escape / commit / scan miss / invariant break ◀──────┘
//! ```
//!
//! `Idle` is represented by the composer holding no session at all.

use super::candidate::{Candidate, TriggerType};
use super::scanner::TriggerScan;

/// Phase of a live session. `Idle` is the absence of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for candidates for the current generation
    Triggered,
    /// Holding a non-empty candidate list the user can navigate
    Populated,
}

/// Result of applying a candidate response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    /// Response matched the current generation and populated the list
    Populated,
    /// Response matched but carried no candidates
    Empty,
    /// Response was for an older generation and was dropped
    Stale,
}

/// Live state for an in-progress `@`/`#` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSession {
    pub trigger: TriggerType,
    pub start_offset: usize,
    pub query: String,
    pub candidates: Vec<Candidate>,
    pub selected_index: usize,
    pub generation: u64,
    pub phase: SessionPhase,
}

impl SuggestionSession {
    /// Open a session from a scan hit
    pub fn open(scan: TriggerScan, generation: u64) -> Self {
        Self {
            trigger: scan.trigger,
            start_offset: scan.start_offset,
            query: scan.query,
            candidates: Vec::new(),
            selected_index: 0,
            generation,
            phase: SessionPhase::Triggered,
        }
    }

    /// Whether a scan hit continues this session (same trigger character)
    pub fn continues(&self, scan: &TriggerScan) -> bool {
        self.trigger == scan.trigger && self.start_offset == scan.start_offset
    }

    /// The query text changed: bump the generation and drop the old list.
    pub fn requery(&mut self, query: String, generation: u64) {
        self.query = query;
        self.generation = generation;
        self.candidates.clear();
        self.selected_index = 0;
        self.phase = SessionPhase::Triggered;
    }

    /// Apply a candidate response tagged with `generation`.
    pub fn apply(&mut self, generation: u64, candidates: Vec<Candidate>) -> ApplyResult {
        if generation != self.generation {
            return ApplyResult::Stale;
        }
        if candidates.is_empty() {
            self.candidates.clear();
            self.selected_index = 0;
            self.phase = SessionPhase::Triggered;
            return ApplyResult::Empty;
        }
        self.candidates = candidates;
        self.selected_index = 0;
        self.phase = SessionPhase::Populated;
        ApplyResult::Populated
    }

    pub fn is_populated(&self) -> bool {
        self.phase == SessionPhase::Populated && !self.candidates.is_empty()
    }

    /// ArrowDown with wraparound
    pub fn select_next(&mut self) {
        let len = self.candidates.len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1) % len;
        }
    }

    /// ArrowUp with wraparound
    pub fn select_prev(&mut self) {
        let len = self.candidates.len();
        if len > 0 {
            self.selected_index = (self.selected_index + len - 1) % len;
        }
    }

    /// Pointer hover; out of range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.candidates.len() {
            self.selected_index = index;
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.candidates.get(self.selected_index)
    }

    /// Check the buffer invariants: `start_offset < caret`, the query is
    /// exactly the text between trigger and caret, contains no whitespace
    /// and fits the length bound.
    ///
    /// `before_caret` is the text up to the caret, `caret` its length in
    /// characters. Only the trailing query and trigger are read.
    pub fn holds_for(&self, before_caret: &str, caret: usize, max_query_len: usize) -> bool {
        if self.start_offset >= caret {
            return false;
        }
        let query_len = caret - self.start_offset - 1;
        if query_len > max_query_len || self.query.contains(char::is_whitespace) {
            return false;
        }
        let mut tail = before_caret.chars().rev();
        tail.by_ref().take(query_len).eq(self.query.chars().rev())
            && tail.next() == Some(self.trigger.marker())
    }
}
