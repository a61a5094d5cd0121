//! Leaderboard - Local top scores
//!
//! Kept sorted by descending score and capped at `MAX_ENTRIES`. The whole
//! list is re-serialized on every change.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StoreError};

pub const LEADERBOARD_KEY: &str = "leaderboard";
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    /// Unix seconds
    pub timestamp: u64,
}

pub struct Leaderboard<S: KeyValueStore> {
    store: S,
    entries: Vec<ScoreEntry>,
}

impl<S: KeyValueStore> Leaderboard<S> {
    /// Load saved scores. Missing or unreadable data starts empty.
    pub fn load(store: S) -> Self {
        let mut entries: Vec<ScoreEntry> = match store.get(LEADERBOARD_KEY) {
            Some(blob) => serde_json::from_value(blob).unwrap_or_else(|e| {
                log::debug!("Discarding unreadable leaderboard: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);

        Self { store, entries }
    }

    /// Best first
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Whether `score` would make it onto the board
    pub fn is_high_score(&self, score: u32) -> bool {
        match self.entries.get(MAX_ENTRIES - 1) {
            Some(lowest) => score > lowest.score,
            None => true,
        }
    }

    /// 1-based position `score` would take: ahead of the first entry it
    /// strictly beats, behind every entry it only ties. `None` if that is
    /// past the last kept place.
    pub fn rank_for(&self, score: u32) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len())
            + 1;
        (rank <= MAX_ENTRIES).then_some(rank)
    }

    /// Record a score. Returns its 1-based position if it was kept.
    pub fn add_score(&mut self, name: impl Into<String>, score: u32, timestamp: u64) -> Option<usize> {
        let entry = ScoreEntry {
            name: name.into(),
            score,
            timestamp,
        };
        // Behind every entry it only ties
        let index = self.entries.partition_point(|e| e.score >= score);
        let position = (index < MAX_ENTRIES).then_some(index + 1);
        if let Some(position) = position {
            log::info!("{} scored {} (#{})", entry.name, score, position);
        }

        self.entries.insert(index, entry);
        self.entries.truncate(MAX_ENTRIES);
        self.persist();
        position
    }

    /// Record a score stamped with the current time
    pub fn add_score_now(&mut self, name: impl Into<String>, score: u32) -> Option<usize> {
        self.add_score(name, score, unix_now())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        let result = serde_json::to_value(&self.entries)
            .map_err(StoreError::Json)
            .and_then(|blob| self.store.set(LEADERBOARD_KEY, blob));
        if let Err(e) = result {
            log::warn!("Failed to persist leaderboard: {}", e);
        }
    }
}

/// Seconds since the Unix epoch, 0 if the clock is before it
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
