//! Login screen state

use crate::records::{LeaderboardEntry, PlayerStats, RecordStore, DEFAULT_LEADERBOARD_SIZE};

/// Longest username accepted from the keyboard
const MAX_USERNAME_LEN: usize = 16;

/// Username entry plus the leaderboard shown beside it
#[derive(Debug, Clone, Default)]
pub struct LoginScreen {
    /// Text typed so far
    pub username: String,
    /// Last login failure, shown under the input
    pub error: Option<String>,
    /// Top players, refreshed whenever the screen is shown
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl LoginScreen {
    pub fn new(store: &RecordStore) -> Self {
        Self {
            leaderboard: store.leaderboard(DEFAULT_LEADERBOARD_SIZE),
            ..Self::default()
        }
    }

    /// Add a typed character
    pub fn text_input_char(&mut self, c: char) {
        if !c.is_control() && self.username.chars().count() < MAX_USERNAME_LEN {
            self.username.push(c);
            self.error = None;
        }
    }

    /// Remove the last character
    pub fn text_input_backspace(&mut self) {
        self.username.pop();
        self.error = None;
    }

    /// Attempt to log in with the typed name
    ///
    /// On success returns the trimmed name and its stats; on failure the
    /// error is kept for display.
    pub fn submit(&mut self, store: &RecordStore) -> Option<(String, PlayerStats)> {
        match store.login(&self.username) {
            Ok(stats) => {
                tracing::info!("Logged in as {}", self.username.trim());
                Some((self.username.trim().to_string(), stats))
            }
            Err(e) => {
                tracing::warn!("Login failed: {:#}", e);
                self.error = Some(e.to_string());
                None
            }
        }
    }
}
