//! High score leaderboard
//!
//! Kept in memory for the current page session, top 10 scores.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Name recorded for a finished run
pub const DEFAULT_PLAYER_NAME: &str = "New Player";

/// Entries the board starts out with
const SEED_ENTRIES: [(&str, u64); MAX_HIGH_SCORES] = [
    ("Player", 1500),
    ("Mouse", 15890),
    ("Black Cat", 25000),
    ("4Player", 780),
    ("CasualGamer", 900),
    ("TetrisMaster", 250),
    ("ProGamer", 100),
    ("Spicy Chicken", 8000),
    ("Player9", 100),
    ("Harry Dotter", 3750),
];

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name
    pub name: String,
    /// Player's score
    pub score: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Leaderboard pre-filled with the house scores
    pub fn with_defaults() -> Self {
        let mut scores = Self::new();
        for (name, score) in SEED_ENTRIES {
            scores.add_score(name, score);
        }
        scores
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
        };

        // Ties go after existing entries
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        log::debug!("{} entered the leaderboard at #{} with {}", name, rank, score);
        Some(rank)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
