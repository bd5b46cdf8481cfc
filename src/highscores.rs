//! High score leaderboard
//!
//! Persisted as a plain JSON array of integers, tracks the top 5 scores.

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_LEN;
use crate::error::Result;
use crate::persistence::KeyValueStore;

/// Final scores from past sessions, highest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    scores: Vec<u32>,
}

impl Leaderboard {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "flappyDustLeaderboard";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Build from arbitrary scores, applying ordering and the size cap
    pub fn from_scores(scores: impl IntoIterator<Item = u32>) -> Self {
        let mut board = Self {
            scores: scores.into_iter().collect(),
        };
        board.normalize();
        board
    }

    /// Scores, highest first
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.scores.first().copied()
    }

    /// Add a final score. Returns the 1-indexed rank it landed at, or `None`
    /// if it fell off the end.
    pub fn push(&mut self, score: u32) -> Option<usize> {
        // Ties rank below existing equal scores
        let pos = self
            .scores
            .iter()
            .position(|&s| score > s)
            .unwrap_or(self.scores.len());
        self.scores.insert(pos, score);
        self.scores.truncate(LEADERBOARD_LEN);
        (pos < LEADERBOARD_LEN).then_some(pos + 1)
    }

    fn normalize(&mut self) {
        self.scores.sort_unstable_by(|a, b| b.cmp(a));
        self.scores.truncate(LEADERBOARD_LEN);
    }

    /// Parse a stored value. Anything unreadable is an empty board.
    pub fn parse(json: &str) -> Self {
        match serde_json::from_str::<Vec<u32>>(json) {
            Ok(scores) => Self::from_scores(scores),
            Err(e) => {
                log::warn!("Discarding malformed leaderboard: {}", e);
                Self::new()
            }
        }
    }

    /// Load from storage, empty on a missing key or read failure
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                let board = Self::parse(&json);
                log::info!("Loaded {} high scores", board.scores.len());
                board
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read high scores: {}", e);
                Self::new()
            }
        }
    }

    /// Write to storage
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.scores.len());
        Ok(())
    }

    /// Read-modify-write of a finished session's score
    pub fn record(store: &mut dyn KeyValueStore, score: u32) -> Self {
        let mut board = Self::load(store);
        if let Some(rank) = board.push(score) {
            log::info!("Score {} placed #{}", score, rank);
        }
        if let Err(e) = board.save(store) {
            log::warn!("Could not save high scores: {}", e);
        }
        board
    }
}
