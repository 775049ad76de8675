//! The composer: one editable field with inline `@`/`#` suggestions.
//!
//! Owns the [`TextBuffer`] and at most one [`SuggestionSession`]. Every
//! text or caret change re-runs the scanner; the session is opened,
//! re-queried or torn down from the scan result alone, never repaired.
//! Candidate queries leave as [`Cmd::QueryCandidates`] stamped with a
//! generation, and responses come back through
//! [`Composer::apply_candidates`], which drops anything stale.
//!
//! Composers are independent values. Nothing here is global, so one page
//! can hold as many as it has fields.

use crate::caret::{CaretLocator, Point, Rect};
use crate::commands::Cmd;
use crate::config::ComposerConfig;
use crate::editable::TextBuffer;
use crate::keys::{Key, KeyOutcome};
use crate::source::{CandidateRequest, SourceError};
use crate::trigger::{
    scan_with_limit, ApplyResult, Candidate, SuggestionSession, TriggerScan, TriggerType,
};

/// Callback run after every buffer mutation
pub type Observer = Box<dyn FnMut(&TextBuffer)>;

/// What the host renders: the field plus an optional popup.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ComposerView {
    pub value: String,
    pub caret: usize,
    /// A trigger is active (the popup may still be waiting for results)
    pub session_open: bool,
    /// The popup has candidates to show
    pub popup_visible: bool,
    pub trigger: Option<TriggerType>,
    pub query: Option<String>,
    pub candidates: Vec<Candidate>,
    pub selected_index: usize,
}

pub struct Composer {
    buffer: TextBuffer,
    session: Option<SuggestionSession>,
    generation: u64,
    config: ComposerConfig,
    observers: Vec<Observer>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(ComposerConfig::default())
    }
}

impl Composer {
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            buffer: TextBuffer::new(),
            session: None,
            generation: 0,
            config,
            observers: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn session(&self) -> Option<&SuggestionSession> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Register an observer, called with the buffer after every mutation
    pub fn subscribe(&mut self, observer: impl FnMut(&TextBuffer) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer(&self.buffer);
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn request_for(&self, session: &SuggestionSession) -> CandidateRequest {
        CandidateRequest {
            generation: session.generation,
            trigger: session.trigger,
            query: session.query.clone(),
            limit: self.config.candidate_limit,
        }
    }

    // =========================================================================
    // Text input
    // =========================================================================

    /// The field's text or caret changed, from any source (typing, paste,
    /// IME, programmatic insertion, caret movement).
    pub fn on_text_change(&mut self, value: impl Into<String>, caret: usize) -> Option<Cmd> {
        self.buffer.set(value.into(), caret);
        self.notify();
        self.rescan()
    }

    fn rescan(&mut self) -> Option<Cmd> {
        let hit = scan_with_limit(
            self.buffer.as_str(),
            self.buffer.caret(),
            self.config.max_query_len,
        );

        let Some(hit) = hit else {
            return self.teardown("no trigger before caret");
        };

        match self.session.take() {
            Some(mut session) if session.continues(&hit) => {
                if session.query == hit.query {
                    self.session = Some(session);
                    return None;
                }
                let generation = self.next_generation();
                tracing::debug!(
                    generation,
                    query = %hit.query,
                    "session query changed"
                );
                session.requery(hit.query, generation);
                let request = self.request_for(&session);
                self.session = Some(session);
                Some(Cmd::Batch(vec![Cmd::QueryCandidates(request), Cmd::Redraw]))
            }
            _ => Some(self.open_session(hit)),
        }
    }

    fn open_session(&mut self, hit: TriggerScan) -> Cmd {
        let generation = self.next_generation();
        tracing::debug!(
            generation,
            trigger = %hit.trigger,
            start = hit.start_offset,
            query = %hit.query,
            "session opened"
        );
        let session = SuggestionSession::open(hit, generation);
        let request = self.request_for(&session);
        self.session = Some(session);
        Cmd::Batch(vec![Cmd::QueryCandidates(request), Cmd::Redraw])
    }

    fn teardown(&mut self, reason: &str) -> Option<Cmd> {
        let session = self.session.take()?;
        tracing::debug!(generation = session.generation, reason, "session closed");
        Some(Cmd::Redraw)
    }

    // =========================================================================
    // Keyboard and pointer
    // =========================================================================

    /// Handle a key while the popup is visible.
    ///
    /// Navigation, commit and cancel keys are consumed only when there are
    /// candidates on screen; otherwise every key passes through untouched.
    pub fn on_key_down(&mut self, key: &Key) -> KeyOutcome {
        let Some(session) = self.session.as_mut().filter(|s| s.is_populated()) else {
            return KeyOutcome::PassThrough;
        };

        match key {
            Key::Down => {
                session.select_next();
                KeyOutcome::Handled
            }
            Key::Up => {
                session.select_prev();
                KeyOutcome::Handled
            }
            Key::Enter | Key::Tab => {
                if self.commit_selected() {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::PassThrough
                }
            }
            Key::Escape => {
                self.cancel();
                KeyOutcome::Handled
            }
            _ => KeyOutcome::PassThrough,
        }
    }

    /// Highlight a row (pointer hover). Ignored unless the popup is visible.
    pub fn select_index(&mut self, index: usize) -> bool {
        match self.session.as_mut() {
            Some(session) if session.is_populated() => session.select(index),
            _ => false,
        }
    }

    /// Commit the highlighted candidate, if the popup is visible
    pub fn commit_selected(&mut self) -> bool {
        let selected = self
            .session
            .as_ref()
            .filter(|s| s.is_populated())
            .and_then(|s| s.selected())
            .cloned();
        match selected {
            Some(candidate) => self.commit(&candidate),
            None => false,
        }
    }

    /// Replace the trigger span with the candidate's marker text plus one
    /// trailing space and put the caret after the space.
    ///
    /// A no-op returning `false` when no session is open, when the session
    /// no longer matches the buffer, or when the candidate is for the other
    /// trigger type (a late callback from an older popup).
    pub fn commit(&mut self, candidate: &Candidate) -> bool {
        let Some(session) = self.session.take() else {
            tracing::debug!("commit without a session ignored");
            return false;
        };

        if candidate.trigger() != session.trigger {
            tracing::debug!(
                session = %session.trigger,
                candidate = %candidate.trigger(),
                "commit for other trigger type ignored"
            );
            self.session = Some(session);
            return false;
        }

        let (before, caret) = (self.buffer.before_caret(), self.buffer.caret());
        if !session.holds_for(before, caret, self.config.max_query_len) {
            tracing::debug!(generation = session.generation, "stale session dropped on commit");
            return false;
        }

        let insert = format!("{} ", candidate.marker_text());
        self.buffer
            .replace(session.start_offset..self.buffer.caret(), &insert);
        tracing::debug!(
            generation = session.generation,
            inserted = %insert,
            caret = self.buffer.caret(),
            "committed candidate"
        );
        self.notify();
        true
    }

    /// Close the session without touching the buffer
    pub fn cancel(&mut self) -> bool {
        self.teardown("cancelled").is_some()
    }

    // =========================================================================
    // Async results and layout
    // =========================================================================

    /// Apply a candidate response stamped with `generation`.
    ///
    /// Responses for any generation other than the live session's are
    /// dropped. A failed query counts as an empty result.
    pub fn apply_candidates(
        &mut self,
        generation: u64,
        result: Result<Vec<Candidate>, SourceError>,
    ) -> Option<Cmd> {
        let limit = self.config.candidate_limit;
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(generation, "candidates dropped: no session");
            return None;
        };

        if generation != session.generation {
            tracing::debug!(
                generation,
                current = session.generation,
                "stale candidates dropped"
            );
            return None;
        }

        let mut candidates = match result {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(generation, "candidate query failed: {}", e);
                Vec::new()
            }
        };
        candidates.retain(|c| c.trigger() == session.trigger);
        candidates.truncate(limit);

        match session.apply(generation, candidates) {
            ApplyResult::Populated => Some(Cmd::Redraw),
            ApplyResult::Empty | ApplyResult::Stale => None,
        }
    }

    /// The field was resized or restyled
    pub fn layout_changed(&self) -> Option<Cmd> {
        self.popup_visible().then_some(Cmd::RepositionPopup)
    }

    /// Whether the live session, if any, still matches the buffer
    pub fn invariants_hold(&self) -> bool {
        self.session.as_ref().map_or(true, |session| {
            session.holds_for(
                self.buffer.before_caret(),
                self.buffer.caret(),
                self.config.max_query_len,
            )
        })
    }

    pub fn popup_visible(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_populated())
    }

    /// Where to put the popup: just below the caret line.
    ///
    /// Measured fresh on every call. `None` when no popup is visible or the
    /// caret cannot be measured.
    pub fn popup_anchor(&self, locator: &dyn CaretLocator, bounds: &Rect) -> Option<Point> {
        if !self.popup_visible() {
            return None;
        }
        match locator.locate(self.buffer.as_str(), self.buffer.caret(), bounds) {
            Ok(caret) => Some(Point::new(caret.x, caret.y + locator.line_height())),
            Err(e) => {
                tracing::debug!("popup not anchored: {}", e);
                None
            }
        }
    }

    pub fn view(&self) -> ComposerView {
        let session = self.session.as_ref();
        let popup_visible = self.popup_visible();
        ComposerView {
            value: self.buffer.as_str().to_string(),
            caret: self.buffer.caret(),
            session_open: session.is_some(),
            popup_visible,
            trigger: session.map(|s| s.trigger),
            query: session.map(|s| s.query.clone()),
            candidates: if popup_visible {
                session.map(|s| s.candidates.clone()).unwrap_or_default()
            } else {
                Vec::new()
            },
            selected_index: session.map_or(0, |s| s.selected_index),
        }
    }
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("buffer", &self.buffer)
            .field("session", &self.session)
            .field("generation", &self.generation)
            .field("observers", &self.observers.len())
            .finish()
    }
}
