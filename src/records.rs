//! Player records persisted as JSON
//!
//! Stores one entry per username in `records.json` under the platform data
//! directory (or a path given on the command line).

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Number of entries returned by `leaderboard` when no limit is given
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Per-player statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub high_score: u64,
    pub games_played: u32,
}

/// Result of recording a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub accepted: bool,
    pub is_new_record: bool,
    pub stats: PlayerStats,
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub stats: PlayerStats,
}

type RecordMap = BTreeMap<String, PlayerStats>;

/// File-backed store of player records
///
/// Clones share one lock, so a background submission and a foreground login
/// never interleave their read-modify-write cycles.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl RecordStore {
    /// Open a store at an explicit path; the file is created on first write
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Default location in the platform data directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "stackfall", "stackfall")
            .map(|dirs| dirs.data_dir().join("records.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Log a player in, creating their record if it does not exist
    pub fn login(&self, username: &str) -> Result<PlayerStats> {
        let username = validate_username(username)?;
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut records = self.load();
        if let Some(stats) = records.get(username) {
            return Ok(*stats);
        }

        let stats = PlayerStats::default();
        records.insert(username.to_string(), stats);
        self.save(&records)?;
        tracing::info!("Created record for {}", username);
        Ok(stats)
    }

    /// Record a finished game for a known player
    pub fn submit_score(&self, username: &str, score: u64) -> Result<Submission> {
        let username = validate_username(username)?;
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut records = self.load();
        let Some(stats) = records.get_mut(username) else {
            bail!("unknown player {:?}", username);
        };

        stats.games_played += 1;
        if score > stats.high_score {
            stats.high_score = score;
        }
        let stats = *stats;
        self.save(&records)?;

        Ok(Submission {
            accepted: true,
            is_new_record: score > 0 && score == stats.high_score,
            stats,
        })
    }

    /// Look up a player's statistics
    pub fn stats(&self, username: &str) -> Option<PlayerStats> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.load().get(username.trim()).copied()
    }

    /// Top players by high score, best first
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries: Vec<_> = self
            .load()
            .into_iter()
            .map(|(username, stats)| LeaderboardEntry { username, stats })
            .collect();
        // Stable sort keeps ties in name order
        entries.sort_by(|a, b| b.stats.high_score.cmp(&a.stats.high_score));
        entries.truncate(limit);
        entries
    }

    /// Read all records; a missing or unreadable file is an empty store
    fn load(&self) -> RecordMap {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(_) => return RecordMap::new(),
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring corrupt records file {}: {}", self.path.display(), e);
            RecordMap::new()
        })
    }

    fn save(&self, records: &RecordMap) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let contents = serde_json::to_string_pretty(records).context("failed to serialize records")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

fn validate_username(username: &str) -> Result<&str> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        bail!("username is required");
    }
    Ok(trimmed)
}
