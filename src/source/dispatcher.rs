//! Runs candidate queries off the event loop.
//!
//! Each request gets its own worker thread; results come back through the
//! host's message channel in whatever order the source finishes. There is
//! no cancellation. Stale results are dropped by the composer on arrival.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

use super::{CandidateRequest, CandidateSource, SourceError};
use crate::messages::Msg;

/// Executes `Cmd::QueryCandidates` against a source in the background.
#[derive(Clone)]
pub struct CandidateDispatcher {
    source: Arc<dyn CandidateSource>,
    tx: Sender<Msg>,
}

impl CandidateDispatcher {
    pub fn new(source: Arc<dyn CandidateSource>, tx: Sender<Msg>) -> Self {
        Self { source, tx }
    }

    /// Start a query; the result is posted as `Msg::CandidatesLoaded`.
    ///
    /// Exactly one message is posted per request. A source that panics is
    /// reported as `SourceError::Unavailable`.
    pub fn dispatch(&self, request: CandidateRequest) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tracing::debug!(
            generation = request.generation,
            trigger = %request.trigger,
            query = %request.query,
            "dispatching candidate query"
        );
        std::thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                source.query(request.trigger, &request.query, request.limit)
            }))
            .unwrap_or_else(|payload| {
                let reason = panic_message(payload.as_ref());
                tracing::error!(
                    generation = request.generation,
                    %reason,
                    "candidate source panicked"
                );
                Err(SourceError::Unavailable(format!("source panicked: {}", reason)))
            });
            let _ = tx.send(Msg::CandidatesLoaded {
                generation: request.generation,
                result,
            });
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl std::fmt::Debug for CandidateDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateDispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::{Candidate, HashtagCandidate, TriggerType};
    use std::sync::mpsc;

    #[test]
    fn test_dispatch_posts_result_with_generation() {
        let (tx, rx) = mpsc::channel();
        let source = |_: TriggerType, q: &str, _: usize| -> Result<Vec<Candidate>, SourceError> {
            Ok(vec![Candidate::Hashtag(HashtagCandidate::new(q, 1))])
        };
        let dispatcher = CandidateDispatcher::new(Arc::new(source), tx);

        dispatcher
            .dispatch(CandidateRequest {
                generation: 7,
                trigger: TriggerType::Hashtag,
                query: "pool".into(),
                limit: 5,
            })
            .join()
            .unwrap();

        match rx.recv().unwrap() {
            Msg::CandidatesLoaded { generation, result } => {
                assert_eq!(generation, 7);
                assert_eq!(result.unwrap()[0].label(), "pool");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_forwards_errors() {
        let (tx, rx) = mpsc::channel();
        let source = |_: TriggerType, _: &str, _: usize| -> Result<Vec<Candidate>, SourceError> {
            Err(SourceError::Unavailable("offline".into()))
        };
        let dispatcher = CandidateDispatcher::new(Arc::new(source), tx);
        dispatcher
            .dispatch(CandidateRequest {
                generation: 1,
                trigger: TriggerType::Mention,
                query: String::new(),
                limit: 5,
            })
            .join()
            .unwrap();

        assert!(matches!(
            rx.recv().unwrap(),
            Msg::CandidatesLoaded { result: Err(_), .. }
        ));
    }

    #[test]
    fn test_panicking_source_still_posts_result() {
        let (tx, rx) = mpsc::channel();
        let source = |_: TriggerType, q: &str, _: usize| -> Result<Vec<Candidate>, SourceError> {
            panic!("lookup exploded for {}", q)
        };
        let dispatcher = CandidateDispatcher::new(Arc::new(source), tx);
        dispatcher
            .dispatch(CandidateRequest {
                generation: 4,
                trigger: TriggerType::Hashtag,
                query: "p".into(),
                limit: 5,
            })
            .join()
            .unwrap();

        match rx.recv().unwrap() {
            Msg::CandidatesLoaded { generation, result } => {
                assert_eq!(generation, 4);
                match result {
                    Err(SourceError::Unavailable(reason)) => {
                        assert!(reason.contains("lookup exploded for p"))
                    }
                    other => panic!("expected unavailable, got {:?}", other),
                }
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
