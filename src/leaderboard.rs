//! Match leaderboard
//!
//! Persisted through `persistence`, keeps the top 5 results by rounds won.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};
use crate::sim::{LeaderboardSink, Side};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 5;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Winner's display name
    pub name: String,
    /// Rounds won in the match
    pub rounds_won: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Display name for a winning side
pub fn winner_name(side: Side) -> &'static str {
    match side {
        Side::Left => "Player",
        Side::Right => "CPU",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Storage key
    const STORAGE_KEY: &'static str = "duel_pong_leaderboard";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Where a result would be inserted. Entries stay sorted by rounds won,
    /// descending, and an equal result goes after the ones already there.
    fn slot_for(&self, rounds_won: u32) -> usize {
        self.entries.partition_point(|e| e.rounds_won >= rounds_won)
    }

    /// A result makes the board if it wins at least one round and lands
    /// inside the top `MAX_ENTRIES`
    pub fn qualifies(&self, rounds_won: u32) -> bool {
        rounds_won > 0 && self.slot_for(rounds_won) < MAX_ENTRIES
    }

    /// 1-based rank a result would take, None if it doesn't qualify
    pub fn potential_rank(&self, rounds_won: u32) -> Option<usize> {
        self.qualifies(rounds_won).then(|| self.slot_for(rounds_won) + 1)
    }

    /// Insert a qualifying result and drop whatever falls off the end.
    /// Returns the 1-based rank taken.
    pub fn add(&mut self, name: &str, rounds_won: u32, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(rounds_won)?;
        self.entries.insert(
            rank - 1,
            LeaderboardEntry {
                name: name.to_string(),
                rounds_won,
                timestamp,
            },
        );
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best entry (if any)
    pub fn top(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    /// Reset the board, including saved copy
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = persistence::remove(Self::STORAGE_KEY) {
            log::warn!("Could not remove saved leaderboard: {}", e);
        }
    }

    /// Load the saved leaderboard, or an empty one
    pub fn load() -> Self {
        Self::from_stored(persistence::load::<Leaderboard>(Self::STORAGE_KEY))
    }

    pub fn save(&self) {
        self.log_saved(persistence::save(Self::STORAGE_KEY, self));
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(dir: &Path) -> Self {
        Self::from_stored(persistence::load_in::<Leaderboard>(dir, Self::STORAGE_KEY))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, dir: &Path) {
        self.log_saved(persistence::save_in(dir, Self::STORAGE_KEY, self));
    }

    fn from_stored(stored: Result<Option<Leaderboard>, PersistError>) -> Self {
        match stored {
            Ok(Some(mut board)) => {
                // Saved data may predate the current cap
                board.entries.truncate(MAX_ENTRIES);
                log::info!("Loaded {} leaderboard entries", board.entries.len());
                board
            }
            Ok(None) => {
                log::info!("No leaderboard found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not load leaderboard ({}), starting fresh", e);
                Self::new()
            }
        }
    }

    fn log_saved(&self, result: Result<(), PersistError>) {
        match result {
            Ok(()) => log::info!("Leaderboard saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Could not save leaderboard: {}", e),
        }
    }
}

impl LeaderboardSink for Leaderboard {
    fn record_result(&mut self, winner: Side, rounds_won: u32, timestamp: f64) {
        if let Some(rank) = self.add(winner_name(winner), rounds_won, timestamp) {
            log::info!("{} placed #{} on the leaderboard", winner_name(winner), rank);
        }
    }
}
