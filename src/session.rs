//! A logged-in player's play session
//!
//! Owns the engine for one player together with their stats and the
//! result of the last score submission. Created on login, dropped when the
//! player returns to the login screen.

use crate::game::{Game, GameOverCause, GameState};
use crate::randomizer::Randomizer;
use crate::records::{PlayerStats, RecordStore};
use crate::settings::Settings;
use crate::submit::{self, SubmissionOutcome, SubmissionReceiver};
use std::time::{Duration, Instant};

/// Input delay after game over to prevent an accidental restart or logout
pub const GAME_OVER_INPUT_DELAY: Duration = Duration::from_millis(750);

pub struct Session {
    pub game: Game,
    /// Stats as of login, refreshed by each accepted submission
    pub player: PlayerStats,
    /// Result of submitting the current game's score, once known
    pub outcome: Option<SubmissionOutcome>,
    receiver: SubmissionReceiver,
    /// When the current game was first seen over
    ended_at: Option<Instant>,
}

impl Session {
    pub fn new(
        username: &str,
        player: PlayerStats,
        settings: &Settings,
        seed: Option<u64>,
        store: &RecordStore,
        handle: tokio::runtime::Handle,
    ) -> Self {
        let (width, height) = settings.gameplay.board_size();
        let randomizer = match seed {
            Some(seed) => Randomizer::with_seed(seed),
            None => Randomizer::new(),
        };
        tracing::info!(
            "Session for {} on {}x{} board, seed {}",
            username,
            width,
            height,
            randomizer.seed()
        );

        let (submitter, receiver) = submit::background(handle, store.clone());
        let game = Game::new(width, height, username, Box::new(randomizer), Box::new(submitter));

        Self {
            game,
            player,
            outcome: None,
            receiver,
            ended_at: None,
        }
    }

    /// Start a fresh game for the same player
    pub fn restart(&mut self) {
        self.outcome = None;
        self.ended_at = None;
        self.game.start();
    }

    /// Per-frame bookkeeping after the engine has been ticked
    pub fn update(&mut self, now: Instant) {
        if self.game.is_game_over() {
            self.ended_at.get_or_insert(now);
        } else {
            self.ended_at = None;
        }
        self.poll_submission();
    }

    /// Whether the game-over screen has been up long enough to take keys
    pub fn accepts_menu_input(&self, now: Instant) -> bool {
        self.ended_at
            .is_some_and(|ended| now.saturating_duration_since(ended) >= GAME_OVER_INPUT_DELAY)
    }

    /// Pick up finished submissions
    pub fn poll_submission(&mut self) {
        while let Some(outcome) = self.receiver.poll() {
            if let Some(stats) = outcome.stats {
                self.player = stats;
            }
            // Only attach the outcome to the game it belongs to
            if self.game.state() == GameState::GameOver(GameOverCause::ToppedOut)
                && outcome.game == self.game.game_number()
            {
                self.outcome = Some(outcome);
            }
        }
    }

    /// Whether the game ended by topping out and its result is still pending
    pub fn awaiting_submission(&self) -> bool {
        self.game.state() == GameState::GameOver(GameOverCause::ToppedOut) && self.outcome.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Action;

    fn setup(name: &str) -> (tokio::runtime::Runtime, RecordStore, PlayerStats) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let store = RecordStore::open(
            std::env::temp_dir()
                .join("stackfall-tests")
                .join(format!("session-{:08x}.json", rand::random::<u32>())),
        );
        let stats = store.login(name).unwrap();
        (runtime, store, stats)
    }

    #[test]
    fn test_top_out_reports_outcome() {
        let (runtime, store, stats) = setup("hana");
        let mut session = Session::new(
            "hana",
            stats,
            &Settings::default(),
            Some(3),
            &store,
            runtime.handle().clone(),
        );

        // Stacking every piece in the middle never completes a row
        while !session.game.is_game_over() {
            session.game.process_action(Action::SoftDrop);
        }
        assert!(session.awaiting_submission());

        let deadline = Instant::now() + Duration::from_secs(5);
        while session.outcome.is_none() {
            assert!(Instant::now() < deadline, "submission never completed");
            std::thread::sleep(Duration::from_millis(5));
            session.poll_submission();
        }

        assert!(!session.awaiting_submission());
        assert_eq!(session.player.games_played, 1);
        assert_eq!(store.stats("hana").unwrap().games_played, 1);
    }

    #[test]
    fn test_quit_submits_nothing() {
        let (runtime, store, stats) = setup("ivan");
        let mut session = Session::new(
            "ivan",
            stats,
            &Settings::default(),
            Some(9),
            &store,
            runtime.handle().clone(),
        );
        session.game.process_action(Action::Quit);
        assert!(!session.awaiting_submission());

        std::thread::sleep(Duration::from_millis(50));
        session.poll_submission();
        assert!(session.outcome.is_none());
        assert_eq!(store.stats("ivan").unwrap().games_played, 0);
    }

    #[test]
    fn test_stale_outcome_with_same_score_is_ignored() {
        let (runtime, store, stats) = setup("kira");
        let mut session = Session::new(
            "kira",
            stats,
            &Settings::default(),
            Some(3),
            &store,
            runtime.handle().clone(),
        );

        // Top out, then restart before the result comes back
        while !session.game.is_game_over() {
            session.game.process_action(Action::SoftDrop);
        }
        session.restart();
        let deadline = Instant::now() + Duration::from_secs(5);
        while store.stats("kira").unwrap().games_played == 0 {
            assert!(Instant::now() < deadline, "submission never completed");
            std::thread::sleep(Duration::from_millis(5));
        }

        // The second game tops out with the same zero score
        while !session.game.is_game_over() {
            session.game.process_action(Action::SoftDrop);
        }
        std::thread::sleep(Duration::from_millis(20));
        session.poll_submission();
        // Whatever has arrived, only the second game's result may attach
        if let Some(outcome) = &session.outcome {
            assert_eq!(outcome.game, 2);
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        while session.outcome.is_none() {
            assert!(Instant::now() < deadline, "submission never completed");
            std::thread::sleep(Duration::from_millis(5));
            session.poll_submission();
        }
        assert_eq!(session.outcome.as_ref().map(|o| o.game), Some(2));
        assert_eq!(store.stats("kira").unwrap().games_played, 2);
    }

    #[test]
    fn test_game_over_input_delay() {
        let (runtime, store, stats) = setup("lena");
        let mut session = Session::new(
            "lena",
            stats,
            &Settings::default(),
            None,
            &store,
            runtime.handle().clone(),
        );
        let start = Instant::now();
        session.update(start);
        assert!(!session.accepts_menu_input(start));

        session.game.process_action(Action::Quit);
        // Keys pressed before the next frame are still ignored
        assert!(!session.accepts_menu_input(start + GAME_OVER_INPUT_DELAY));

        session.update(start);
        assert!(!session.accepts_menu_input(start + Duration::from_millis(100)));
        // Later frames do not push the deadline back
        session.update(start + Duration::from_millis(500));
        assert!(session.accepts_menu_input(start + GAME_OVER_INPUT_DELAY));

        session.restart();
        assert!(!session.accepts_menu_input(start + GAME_OVER_INPUT_DELAY * 2));
    }

    #[test]
    fn test_restart_clears_outcome() {
        let (runtime, store, stats) = setup("jun");
        let mut session = Session::new(
            "jun",
            stats,
            &Settings::default(),
            None,
            &store,
            runtime.handle().clone(),
        );
        session.game.process_action(Action::Quit);
        session.restart();
        assert!(!session.game.is_game_over());
        assert!(session.outcome.is_none());
    }
}
