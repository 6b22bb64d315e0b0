//! Fire-and-forget score submission
//!
//! The engine hands a final score to a `ScoreSubmitter` and moves on. The
//! background implementation records it on the async runtime and reports
//! the outcome over a channel that the UI polls each frame.

use crate::records::{PlayerStats, RecordStore};
use std::sync::mpsc;

/// Receives the final score of a game that ended by topping out
///
/// `game` numbers the games played on one engine so results can be
/// matched to the game they came from.
pub trait ScoreSubmitter {
    fn submit(&mut self, game: u32, username: &str, score: u64);
}

/// What the presentation layer learns about a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub game: u32,
    pub username: String,
    pub score: u64,
    pub accepted: bool,
    pub is_new_record: bool,
    /// Updated stats when the store accepted the score
    pub stats: Option<PlayerStats>,
}

/// Submits scores to a `RecordStore` without blocking the game loop
pub struct BackgroundSubmitter {
    handle: tokio::runtime::Handle,
    store: RecordStore,
    outcome_tx: mpsc::Sender<SubmissionOutcome>,
}

/// Receiving end for submission outcomes
pub struct SubmissionReceiver {
    outcome_rx: mpsc::Receiver<SubmissionOutcome>,
}

/// Create a submitter bound to a runtime and the receiver for its outcomes
pub fn background(
    handle: tokio::runtime::Handle,
    store: RecordStore,
) -> (BackgroundSubmitter, SubmissionReceiver) {
    let (outcome_tx, outcome_rx) = mpsc::channel();
    (
        BackgroundSubmitter {
            handle,
            store,
            outcome_tx,
        },
        SubmissionReceiver { outcome_rx },
    )
}

impl ScoreSubmitter for BackgroundSubmitter {
    fn submit(&mut self, game: u32, username: &str, score: u64) {
        let store = self.store.clone();
        let tx = self.outcome_tx.clone();
        let username = username.to_string();

        self.handle.spawn(async move {
            let name = username.clone();
            let result =
                tokio::task::spawn_blocking(move || store.submit_score(&name, score)).await;

            let outcome = match result {
                Ok(Ok(submission)) => {
                    tracing::info!(
                        "Recorded score {} for {} (new record: {})",
                        score,
                        username,
                        submission.is_new_record
                    );
                    SubmissionOutcome {
                        game,
                        username,
                        score,
                        accepted: submission.accepted,
                        is_new_record: submission.is_new_record,
                        stats: Some(submission.stats),
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!("Score submission for {} failed: {:#}", username, e);
                    SubmissionOutcome::rejected(game, username, score)
                }
                Err(e) => {
                    tracing::error!("Score submission task panicked: {}", e);
                    SubmissionOutcome::rejected(game, username, score)
                }
            };

            // The UI may have moved on; nobody listening is fine
            let _ = tx.send(outcome);
        });
    }
}

impl SubmissionOutcome {
    /// A failed submission is presented as "not a new record"
    fn rejected(game: u32, username: String, score: u64) -> Self {
        Self {
            game,
            username,
            score,
            accepted: false,
            is_new_record: false,
            stats: None,
        }
    }
}

impl SubmissionReceiver {
    /// Check for a finished submission (non-blocking)
    pub fn poll(&self) -> Option<SubmissionOutcome> {
        self.outcome_rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(receiver: &SubmissionReceiver) -> SubmissionOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = receiver.poll() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "no submission outcome arrived");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn temp_store() -> RecordStore {
        RecordStore::open(
            std::env::temp_dir()
                .join("stackfall-tests")
                .join(format!("submit-{:08x}.json", rand::random::<u32>())),
        )
    }

    #[test]
    fn test_background_submission_reports_record() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let store = temp_store();
        store.login("frank").unwrap();

        let (mut submitter, receiver) = background(runtime.handle().clone(), store.clone());
        submitter.submit(4, "frank", 2400);

        let outcome = wait_for(&receiver);
        assert_eq!(outcome.game, 4);
        assert!(outcome.accepted);
        assert!(outcome.is_new_record);
        assert_eq!(outcome.stats.map(|s| s.games_played), Some(1));
        assert_eq!(store.stats("frank").unwrap().high_score, 2400);
    }

    #[test]
    fn test_failed_submission_degrades_to_no_record() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (mut submitter, receiver) = background(runtime.handle().clone(), temp_store());
        submitter.submit(1, "ghost", 800);

        let outcome = wait_for(&receiver);
        assert!(!outcome.accepted);
        assert!(!outcome.is_new_record);
        assert_eq!(outcome.score, 800);
        assert_eq!(outcome.stats, None);
    }
}
