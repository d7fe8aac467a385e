//! Game state and core simulation types
//!
//! Everything the loop mutates lives in [`GameState`]; the front end only
//! reads it (plus the drained event queue).

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::piece::{Piece, Special};
use super::score::ScoreTracker;
use super::spawn::PieceGenerator;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    Ready,
    /// Active gameplay
    Playing,
    /// A new piece could not be placed
    GameOver,
}

/// Things that happened during a tick or an input, for the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The active piece was merged into the board
    PieceLocked,
    /// Rows were cleared by the last landing
    LinesCleared { rows: usize },
    /// A special piece became the active piece
    SpecialActivated { special: Special },
    /// The run ended with this score
    GameOver { score: u64 },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Tuning this run was started with
    pub settings: Settings,
    /// Current phase
    pub phase: GamePhase,
    /// Settled cells
    pub board: Board,
    /// The falling piece
    pub current: Piece,
    /// Preview of the piece after `current`
    pub next: Piece,
    /// Piece source
    pub generator: PieceGenerator,
    /// Score
    pub score: ScoreTracker,
    /// Time since the last drop (ms)
    pub drop_accumulator_ms: f64,
    /// Total play time this run (ms)
    pub play_ms: f64,
    /// Pending events, oldest first
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state in the `Ready` phase
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut generator = PieceGenerator::new(seed);
        let current = generator.spawn(0, 0.0, &settings);
        let next = generator.spawn(0, 0.0, &settings);

        Self {
            seed,
            board: Board::new(settings.cols, settings.rows),
            settings,
            phase: GamePhase::Ready,
            current,
            next,
            generator,
            score: ScoreTracker::new(),
            drop_accumulator_ms: 0.0,
            play_ms: 0.0,
            events: Vec::new(),
        }
    }

    /// Reset board, score and timers and begin playing
    pub fn start(&mut self) {
        self.board.clear();
        self.score.reset();
        self.generator.reset();
        self.drop_accumulator_ms = 0.0;
        self.play_ms = 0.0;
        self.events.clear();

        self.current = self.generator.spawn(0, 0.0, &self.settings);
        self.next = self.generator.spawn(0, 0.0, &self.settings);
        self.phase = GamePhase::Playing;

        log::info!("Game started (seed {})", self.seed);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Current total score
    pub fn score(&self) -> u64 {
        self.score.total()
    }

    /// Queue an event for the front end
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Promote the preview piece and spawn a new preview
    pub fn activate_next(&mut self) {
        let spawned = self
            .generator
            .spawn(self.score.total(), self.play_ms, &self.settings);
        self.current = std::mem::replace(&mut self.next, spawned);

        if self.current.special.is_special() {
            self.push_event(GameEvent::SpecialActivated {
                special: self.current.special,
            });
        }
    }

    /// Serializable view for renderers and tooling
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            board: self.board.clone(),
            current: self.current.clone(),
            next: self.next.clone(),
            score: self.score.total(),
            rows_cleared: self.score.rows_cleared(),
            play_ms: self.play_ms,
        }
    }
}

/// Read-only copy of what a renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub board: Board,
    pub current: Piece,
    pub next: Piece,
    pub score: u64,
    pub rows_cleared: u64,
    pub play_ms: f64,
}
