//! Game settings and tuning
//!
//! Persisted in LocalStorage on the web, read from a JSON file by the native
//! demo runner. Missing fields fall back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Board width in cells
    pub cols: usize,
    /// Board height in cells
    pub rows: usize,

    // === Timing ===
    /// Milliseconds between automatic drops
    pub drop_interval_ms: f64,

    // === Specials ===
    /// Score at which special pieces start to appear
    pub special_score_threshold: u64,
    /// Play time between special spawns at low scores
    pub special_base_interval_ms: f64,
    /// Largest reduction of the special interval (1 ms per point of score)
    pub special_max_reduction_ms: f64,

    // === Scoring ===
    /// Points credited per cleared row
    pub points_per_row: u64,
    /// Points credited per full second of play
    pub points_per_second: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cols: COLS,
            rows: ROWS,

            drop_interval_ms: DROP_INTERVAL_MS,

            special_score_threshold: SPECIAL_SCORE_THRESHOLD,
            special_base_interval_ms: SPECIAL_BASE_INTERVAL_MS,
            special_max_reduction_ms: SPECIAL_MAX_REDUCTION_MS,

            points_per_row: POINTS_PER_ROW,
            points_per_second: POINTS_PER_SECOND,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Play time that must pass between two special spawns at `score`.
    ///
    /// Shrinks by one millisecond per point, never below
    /// `special_base_interval_ms - special_max_reduction_ms`.
    pub fn special_interval_ms(&self, score: u64) -> f64 {
        let reduction = (score as f64).min(self.special_max_reduction_ms);
        self.special_base_interval_ms - reduction
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cattris_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native builds start from the defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "drop_interval_ms": 250.0 }"#).unwrap();
        assert_eq!(settings.drop_interval_ms, 250.0);
        assert_eq!(settings.cols, COLS);
        assert_eq!(settings.points_per_row, POINTS_PER_ROW);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
        assert!(Settings::from_json(r#"{ "cols": "wide" }"#).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = Settings::default();
        settings.points_per_second = 7;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_special_interval_has_floor() {
        let settings = Settings::default();
        assert_eq!(settings.special_interval_ms(0), 25_000.0);
        assert_eq!(settings.special_interval_ms(100), 24_900.0);
        assert_eq!(settings.special_interval_ms(20_000), 5_000.0);
        assert_eq!(settings.special_interval_ms(1_000_000), 5_000.0);
    }
}
