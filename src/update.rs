//! Update function for the Elm-style architecture
//!
//! Every composer state transition flows through [`update`].

use crate::commands::Cmd;
use crate::composer::Composer;
use crate::messages::Msg;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

/// Main update function
///
/// In debug builds, this wraps with tracing instrumentation and checks the
/// session invariants after every message.
#[inline]
pub fn update(composer: &mut Composer, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(composer, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(composer, msg)
    }
}

fn update_inner(composer: &mut Composer, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::TextChanged { value, caret } => composer.on_text_change(value, caret),
        Msg::KeyDown(key) => composer
            .on_key_down(&key)
            .prevents_default()
            .then_some(Cmd::Redraw),
        Msg::Commit(candidate) => composer.commit(&candidate).then_some(Cmd::Redraw),
        Msg::CommitSelected => composer.commit_selected().then_some(Cmd::Redraw),
        Msg::SelectIndex(index) => composer.select_index(index).then_some(Cmd::Redraw),
        Msg::Cancel => composer.cancel().then_some(Cmd::Redraw),
        Msg::CandidatesLoaded { generation, result } => {
            composer.apply_candidates(generation, result)
        }
        Msg::LayoutChanged => composer.layout_changed(),
    }
}

#[cfg(debug_assertions)]
fn update_traced(composer: &mut Composer, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(composer, msg);

    debug_assert!(
        composer.invariants_hold(),
        "session out of sync with buffer after {}",
        msg_name
    );
    result
}

/// Short display name for a message, without payload
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::TextChanged { caret, .. } => format!("TextChanged(caret={})", caret),
        Msg::KeyDown(key) => format!("KeyDown({})", key),
        Msg::Commit(candidate) => format!("Commit({})", candidate.marker_text()),
        Msg::CommitSelected => "CommitSelected".to_string(),
        Msg::SelectIndex(i) => format!("SelectIndex({})", i),
        Msg::Cancel => "Cancel".to_string(),
        Msg::CandidatesLoaded { generation, .. } => format!("CandidatesLoaded({})", generation),
        Msg::LayoutChanged => "LayoutChanged".to_string(),
    }
}
