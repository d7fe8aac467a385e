//! Cattris - A falling-block puzzle game with cat-shaped pieces
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board, pieces, spawning, scoring, game loop)
//! - `renderer`: Canvas 2D drawing (wasm32 only)
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Data-driven game tuning
//! - `highscores`: In-memory leaderboard

pub mod highscores;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Board dimensions (cells)
    pub const COLS: usize = 10;
    pub const ROWS: usize = 20;

    /// Rendered size of one cell in pixels
    pub const BLOCK_SIZE: f64 = 30.0;

    /// Milliseconds between automatic drops
    pub const DROP_INTERVAL_MS: f64 = 1000.0;

    /// Score at which special pieces start to appear
    pub const SPECIAL_SCORE_THRESHOLD: u64 = 100;
    /// Play time between special spawns at low scores
    pub const SPECIAL_BASE_INTERVAL_MS: f64 = 25_000.0;
    /// Largest amount the special interval shrinks by (1 ms per point)
    pub const SPECIAL_MAX_REDUCTION_MS: f64 = 20_000.0;

    /// Points per cleared row
    pub const POINTS_PER_ROW: u64 = 100;
    /// Points per full second of play
    pub const POINTS_PER_SECOND: u64 = 1;

    /// Horizontal offsets tried in order when a rotation collides
    pub const KICK_OFFSETS: [i32; 5] = [0, -1, 1, -2, 2];

    /// Consecutive draws of one template that force a re-draw
    pub const REPEAT_LIMIT: u32 = 3;
}
