//! High score leaderboard
//!
//! The game only talks to [`LeaderboardService`]. [`HighScores`] is the
//! bundled implementation: a top-10 table persisted to LocalStorage on wasm
//! and kept in memory on native.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// Longest accepted player name
pub const MAX_NAME_LEN: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Upper-case initials, 1-3 characters
    pub name: String,
    pub score: u32,
    /// Whole seconds survived
    pub time: u32,
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("name must be 1-{MAX_NAME_LEN} characters, got {0:?}")]
    InvalidName(String),
    #[error("leaderboard storage unavailable: {0}")]
    Storage(String),
    #[error("leaderboard data is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Leaderboard operations the game relies on
pub trait LeaderboardService {
    /// Best entries first, at most `limit`
    fn fetch_top_entries(&self, limit: usize) -> Result<Vec<HighScoreEntry>, LeaderboardError>;

    /// True if `score` would make the table
    fn would_qualify(&self, score: u32) -> Result<bool, LeaderboardError>;

    /// Record a run. The service keeps only the top entries.
    fn submit_entry(&mut self, name: &str, score: u32, time: u32) -> Result<(), LeaderboardError>;
}

/// Trim and upper-case a name; reject empty or over-long ones
pub fn normalize_name(name: &str) -> Result<String, LeaderboardError> {
    // Length is checked after upper-casing, which can expand a character ('ß' -> "SS")
    let upper = name.trim().to_uppercase();
    let len = upper.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(LeaderboardError::InvalidName(name.to_string()));
    }
    Ok(upper)
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "powder_run_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .get(MAX_HIGH_SCORES - 1)
            .map(|e| score > e.score)
            .unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry in score order and trim to the table size.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        // Ties keep the earlier entry ahead
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Rebuild from stored JSON, re-sorting and trimming whatever was saved
    pub fn from_json(json: &str) -> Result<Self, LeaderboardError> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    pub fn to_json(&self) -> Result<String, LeaderboardError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(scores) => {
                        log::info!("Loaded {} high scores", scores.entries.len());
                        return scores;
                    }
                    Err(e) => log::warn!("Discarding stored high scores: {}", e),
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), LeaderboardError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| LeaderboardError::Storage("LocalStorage not available".into()))?;
        let json = self.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| LeaderboardError::Storage(format!("{:?}", e)))?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), LeaderboardError> {
        // No-op for native
        Ok(())
    }
}

impl LeaderboardService for HighScores {
    fn fetch_top_entries(&self, limit: usize) -> Result<Vec<HighScoreEntry>, LeaderboardError> {
        Ok(self.entries.iter().take(limit).cloned().collect())
    }

    fn would_qualify(&self, score: u32) -> Result<bool, LeaderboardError> {
        Ok(self.qualifies(score))
    }

    fn submit_entry(&mut self, name: &str, score: u32, time: u32) -> Result<(), LeaderboardError> {
        let entry = HighScoreEntry {
            name: normalize_name(name)?,
            score,
            time,
        };
        self.submit_with(entry, HighScores::save)
    }
}

impl HighScores {
    /// Add `entry` and persist. The shown table only changes once `persist` succeeds.
    fn submit_with<F>(&mut self, entry: HighScoreEntry, persist: F) -> Result<(), LeaderboardError>
    where
        F: FnOnce(&HighScores) -> Result<(), LeaderboardError>,
    {
        let score = entry.score;
        let mut next = self.clone();
        let rank = next.add_score(entry);
        persist(&next)?;
        *self = next;
        match rank {
            Some(rank) => log::info!("New high score {} at rank {}", score, rank),
            None => log::info!("Score {} did not make the table", score),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> HighScoreEntry {
        HighScoreEntry {
            name: name.to_string(),
            score,
            time: score / 10,
        }
    }

    fn full_table() -> HighScores {
        let mut scores = HighScores::new();
        for i in 1..=10 {
            scores.add_score(entry("AAA", i * 100));
        }
        scores
    }

    #[test]
    fn test_short_table_always_qualifies() {
        let mut scores = HighScores::new();
        assert!(scores.would_qualify(0).unwrap());
        scores.submit_entry("ab", 5, 1).unwrap();
        assert!(scores.would_qualify(0).unwrap());
    }

    #[test]
    fn test_full_table_needs_to_beat_tenth() {
        let scores = full_table();
        assert!(!scores.qualifies(100));
        assert!(scores.qualifies(101));
        assert_eq!(scores.potential_rank(1001), Some(1));
        assert_eq!(scores.potential_rank(50), None);
    }

    #[test]
    fn test_submit_sorts_and_trims() {
        let mut scores = full_table();
        scores.submit_entry("zed", 550, 55).unwrap();
        let top = scores.fetch_top_entries(10).unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].score, 1000);
        assert_eq!(top[5].name, "ZED");
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(top.last().unwrap().score, 200);
    }

    #[test]
    fn test_fetch_respects_limit() {
        let scores = full_table();
        assert_eq!(scores.fetch_top_entries(3).unwrap().len(), 3);
        assert_eq!(scores.fetch_top_entries(50).unwrap().len(), 10);
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(normalize_name(" jo ").unwrap(), "JO");
        assert!(matches!(
            normalize_name(""),
            Err(LeaderboardError::InvalidName(_))
        ));
        assert!(matches!(
            normalize_name("ABCD"),
            Err(LeaderboardError::InvalidName(_))
        ));
        let mut scores = HighScores::new();
        assert!(scores.submit_entry("toolong", 10, 1).is_err());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_name_limit_applies_after_uppercasing() {
        assert_eq!(normalize_name("ß").unwrap(), "SS");
        assert!(matches!(
            normalize_name("ßßß"),
            Err(LeaderboardError::InvalidName(_))
        ));
        let mut scores = HighScores::new();
        assert!(scores.submit_entry("aßb", 10, 1).is_err());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_failed_save_leaves_table_unchanged() {
        let mut scores = full_table();
        let before = scores.fetch_top_entries(10).unwrap();
        let result = scores.submit_with(entry("ZED", 550), |_| {
            Err(LeaderboardError::Storage("quota exceeded".into()))
        });
        assert!(matches!(result, Err(LeaderboardError::Storage(_))));
        assert_eq!(scores.fetch_top_entries(10).unwrap(), before);

        scores.submit_with(entry("ZED", 550), |_| Ok(())).unwrap();
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries[5].name, "ZED");
    }

    #[test]
    fn test_stored_json_is_normalized() {
        let json = r#"{"entries":[{"name":"B","score":5,"time":1},{"name":"A","score":9,"time":2}]}"#;
        let scores = HighScores::from_json(json).unwrap();
        assert_eq!(scores.top_score(), Some(9));
        assert!(matches!(
            HighScores::from_json("[oops"),
            Err(LeaderboardError::Serialization(_))
        ));
    }
}
