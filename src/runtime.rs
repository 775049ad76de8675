//! Headless event loop driving one composer.
//!
//! Stands in for a UI host: keys go to the composer first, keys it passes
//! through get the field's default editing, every resulting text change
//! goes through [`update`], and candidate queries run on the
//! [`CandidateDispatcher`] with results read back from the message channel.

use std::fmt;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::commands::Cmd;
use crate::composer::Composer;
use crate::editable::TextBuffer;
use crate::keys::{Key, KeyOutcome};
use crate::messages::Msg;
use crate::source::{CandidateDispatcher, CandidateSource};
use crate::update::update;

/// How long `wait` blocks for outstanding queries
pub const DEFAULT_WAIT: Duration = Duration::from_secs(2);

/// One line of a replay script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Type each character as a separate key press
    Type(String),
    /// Press a single named key
    Key(Key),
    /// Move the caret to a character offset
    Caret(usize),
    /// Block until every in-flight candidate query has answered
    Wait,
}

/// A replay script line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

/// Parse a replay script.
///
/// ```text
/// // comment
/// type Hello @Ja
/// wait
/// key ArrowDown
/// key Enter
/// caret 3
/// ```
///
/// `type` keeps everything after the first space verbatim, including
/// further spaces. Blank lines and `//` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let error = |message: String| ScriptError { line, message };

        let trimmed = raw.trim_start();
        if trimmed.trim_end().is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let (command, rest) = match trimmed.split_once(' ') {
            Some((command, rest)) => (command, rest),
            None => (trimmed.trim_end(), ""),
        };

        let step = match command {
            "type" if !rest.is_empty() => Step::Type(rest.to_string()),
            "type" => return Err(error("type needs text".to_string())),
            "key" => Step::Key(rest.trim().parse().map_err(error)?),
            "caret" => Step::Caret(
                rest.trim()
                    .parse()
                    .map_err(|e| error(format!("invalid caret offset: {}", e)))?,
            ),
            "wait" => Step::Wait,
            other => return Err(error(format!("unknown command '{}'", other))),
        };
        steps.push(step);
    }

    Ok(steps)
}

pub struct Runtime {
    composer: Composer,
    dispatcher: CandidateDispatcher,
    msg_rx: Receiver<Msg>,
    in_flight: usize,
    wait_timeout: Duration,
}

impl Runtime {
    pub fn new(composer: Composer, source: Arc<dyn CandidateSource>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            composer,
            dispatcher: CandidateDispatcher::new(source, msg_tx),
            msg_rx,
            in_flight: 0,
            wait_timeout: DEFAULT_WAIT,
        }
    }

    /// Upper bound for `wait` steps (builder pattern)
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Queries dispatched and not yet answered
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Run a message through the update loop, returning whether a redraw
    /// is needed
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        if matches!(msg, Msg::CandidatesLoaded { .. }) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        match update(&mut self.composer, msg) {
            Some(cmd) => {
                let needs_redraw = cmd.needs_redraw();
                self.process_cmd(cmd);
                needs_redraw
            }
            None => false,
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None | Cmd::Redraw | Cmd::RepositionPopup => {}
            Cmd::QueryCandidates(request) => {
                self.in_flight += 1;
                // Detached; the result arrives on msg_rx
                let _ = self.dispatcher.dispatch(request);
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    /// Drain candidate responses that have already arrived
    pub fn process_async_messages(&mut self) -> bool {
        let mut needs_redraw = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            needs_redraw |= self.dispatch(msg);
        }
        needs_redraw
    }

    /// Block until every dispatched query has answered or `timeout` passes.
    /// Returns `false` on timeout.
    pub fn wait_for_candidates(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => {
                    self.dispatch(msg);
                }
                Err(_) => {
                    tracing::warn!(
                        in_flight = self.in_flight,
                        "timed out waiting for candidates"
                    );
                    return false;
                }
            }
        }
        true
    }

    /// Deliver a key press. Keys the composer does not consume get the
    /// field's default editing behavior.
    pub fn press(&mut self, key: Key) -> KeyOutcome {
        let outcome = self.composer.on_key_down(&key);
        if outcome == KeyOutcome::PassThrough {
            if let Some((value, caret)) = default_edit(self.composer.buffer(), &key) {
                self.dispatch(Msg::TextChanged { value, caret });
            }
        }
        outcome
    }

    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(Key::Char(ch));
        }
    }

    pub fn set_caret(&mut self, caret: usize) {
        let value = self.composer.buffer().as_str().to_string();
        self.dispatch(Msg::TextChanged { value, caret });
    }

    pub fn run_step(&mut self, step: &Step) {
        match step {
            Step::Type(text) => self.type_text(text),
            Step::Key(key) => {
                self.press(key.clone());
            }
            Step::Caret(caret) => self.set_caret(*caret),
            Step::Wait => {
                self.wait_for_candidates(self.wait_timeout);
            }
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("composer", &self.composer)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

/// Default editing for a key the popup did not consume
fn default_edit(buffer: &TextBuffer, key: &Key) -> Option<(String, usize)> {
    let mut next = buffer.clone();
    let caret = buffer.caret();
    match key {
        Key::Char(ch) => next.replace(caret..caret, &ch.to_string()),
        Key::Enter => next.replace(caret..caret, "\n"),
        Key::Tab => next.replace(caret..caret, "\t"),
        Key::Backspace if caret > 0 => next.replace(caret - 1..caret, ""),
        Key::Left if caret > 0 => next.set(buffer.as_str().to_string(), caret - 1),
        Key::Right => next.set(buffer.as_str().to_string(), caret + 1),
        _ => return None,
    }
    Some((next.as_str().to_string(), next.caret()))
}
