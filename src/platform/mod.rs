//! Platform abstraction layer
//!
//! Translates browser input into simulation actions. Kept free of `web_sys`
//! types so the mapping is testable on native targets.

use crate::sim::Action;

/// Map a `KeyboardEvent.key` value to an action
pub fn action_for_key(key: &str) -> Option<Action> {
    match key {
        "ArrowLeft" => Some(Action::MoveLeft),
        "ArrowRight" => Some(Action::MoveRight),
        "ArrowDown" => Some(Action::SoftDrop),
        "ArrowUp" => Some(Action::Rotate),
        " " => Some(Action::HardDrop),
        _ => None,
    }
}
