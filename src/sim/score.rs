//! Score tracking
//!
//! Points come from cleared rows and from time survived.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    /// Points earned by clearing rows
    row_points: u64,
    /// Points earned by play time
    time_points: u64,
    /// Total rows cleared this game
    rows_cleared: u64,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Credit `rows` cleared rows
    pub fn add_rows(&mut self, rows: usize, settings: &Settings) {
        let rows = rows as u64;
        self.rows_cleared = self.rows_cleared.saturating_add(rows);
        self.row_points = self
            .row_points
            .saturating_add(rows.saturating_mul(settings.points_per_row));
    }

    /// Credit whole seconds of `play_ms`. Never lowers the time points.
    pub fn update_time(&mut self, play_ms: f64, settings: &Settings) {
        let seconds = (play_ms.max(0.0) / 1000.0).floor() as u64;
        let points = seconds.saturating_mul(settings.points_per_second);
        self.time_points = self.time_points.max(points);
    }

    pub fn total(&self) -> u64 {
        self.row_points.saturating_add(self.time_points)
    }

    pub fn rows_cleared(&self) -> u64 {
        self.rows_cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_and_time_add_up() {
        let settings = Settings::default();
        let mut score = ScoreTracker::new();
        score.add_rows(2, &settings);
        score.update_time(3_999.0, &settings);
        assert_eq!(score.total(), 2 * settings.points_per_row + 3);
        assert_eq!(score.rows_cleared(), 2);
    }

    #[test]
    fn test_time_points_never_decrease() {
        let settings = Settings::default();
        let mut score = ScoreTracker::new();
        score.update_time(10_000.0, &settings);
        score.update_time(2_000.0, &settings);
        assert_eq!(score.total(), 10);
    }

    #[test]
    fn test_huge_play_time_saturates() {
        let settings = Settings {
            points_per_second: 2,
            ..Settings::default()
        };
        let mut score = ScoreTracker::new();
        score.add_rows(1, &settings);
        score.update_time(f64::INFINITY, &settings);
        assert_eq!(score.total(), u64::MAX);
    }

    #[test]
    fn test_reset() {
        let settings = Settings::default();
        let mut score = ScoreTracker::new();
        score.add_rows(4, &settings);
        score.reset();
        assert_eq!(score.total(), 0);
        assert_eq!(score.rows_cleared(), 0);
    }
}
