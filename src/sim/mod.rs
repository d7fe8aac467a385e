//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod board;
pub mod piece;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use board::{Board, Cell};
pub use piece::{CatRole, Piece, PieceKind, Rgba, RoleGrid, SPECIAL_COLOR, Special};
pub use score::ScoreTracker;
pub use spawn::{PieceGenerator, centered_column};
pub use state::{GameEvent, GamePhase, GameSnapshot, GameState};
pub use tick::{Action, apply_action, drop_step, hard_drop, tick};
