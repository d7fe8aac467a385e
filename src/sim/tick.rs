//! Frame-driven game loop
//!
//! The host calls [`tick`] once per animation frame with the elapsed time and
//! [`apply_action`] for every key press. Both run to completion before the
//! next call, so no state is ever observed half-updated.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::piece::Special;
use super::state::{GameEvent, GamePhase, GameState};

/// Player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    /// Drop one row now
    SoftDrop,
    Rotate,
    /// Drop until landing
    HardDrop,
}

/// Advance the game by `dt_ms` milliseconds of wall time
pub fn tick(state: &mut GameState, dt_ms: f64) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let dt_ms = dt_ms.max(0.0);
    state.drop_accumulator_ms += dt_ms;
    state.play_ms += dt_ms;

    if state.drop_accumulator_ms > state.settings.drop_interval_ms {
        if state.current.special == Special::HardDrop {
            hard_drop(state);
        } else {
            drop_step(state);
        }
        state.drop_accumulator_ms = 0.0;
    }

    let play_ms = state.play_ms;
    state.score.update_time(play_ms, &state.settings);
}

/// Apply one player command immediately.
///
/// Returns whether the command changed anything. Ignored unless playing.
pub fn apply_action(state: &mut GameState, action: Action) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }

    match action {
        Action::MoveLeft | Action::MoveRight => {
            if state.current.special == Special::Unmovable {
                return false;
            }
            let dx = if action == Action::MoveLeft { -1 } else { 1 };
            state.current.try_shift(&state.board, IVec2::new(dx, 0))
        }
        Action::Rotate => state.current.rotate(&state.board),
        Action::SoftDrop => {
            drop_step(state);
            true
        }
        Action::HardDrop => {
            hard_drop(state);
            true
        }
    }
}

/// Move the active piece down one row, landing it if blocked
pub fn drop_step(state: &mut GameState) {
    if !state.current.try_shift(&state.board, IVec2::Y) {
        land(state);
    }
    state.drop_accumulator_ms = 0.0;
}

/// Drop the active piece as far as it goes and land it
pub fn hard_drop(state: &mut GameState) {
    while state.current.try_shift(&state.board, IVec2::Y) {}
    land(state);
}

/// Merge the active piece, clear lines, bring in the next piece and check
/// whether it fits
fn land(state: &mut GameState) {
    state.board.merge(&state.current);
    state.push_event(GameEvent::PieceLocked);
    log::trace!(
        "Locked {} at ({}, {})",
        state.current.kind.name(),
        state.current.pos.x,
        state.current.pos.y
    );

    let rows = state.board.clear_lines();
    if rows > 0 {
        state.score.add_rows(rows, &state.settings);
        state.push_event(GameEvent::LinesCleared { rows });
        log::debug!("Cleared {} row(s), score {}", rows, state.score.total());
    }

    state.activate_next();

    if state.board.collides(&state.current) {
        let score = state.score.total();
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver { score });
        log::info!("Game over with {} points", score);
    }
}
