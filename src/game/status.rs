//! Status line derivation
//!
//! The status line is never stored; it is recomputed from the rules engine
//! after every change to the position.

use crate::game::rules::Rules;
use crate::game::types::Side;

/// Text shown in the status area, plus whether it announces the end of the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    pub text: String,
    /// Terminal statuses get the board's game-over styling
    pub game_over: bool,
}

/// Derive the status line for the current position.
///
/// `terminal_result` carries the result string once the arbitration service
/// has declared the game over; without it the status describes whose move it
/// is.
pub fn derive_status<R: Rules + ?Sized>(
    rules: &R,
    human: Side,
    terminal_result: Option<&str>,
) -> StatusText {
    let to_move = rules.turn();

    let Some(result) = terminal_result else {
        let mut text = if to_move == human {
            format!("Your move ({to_move})")
        } else {
            format!("AI is thinking ({to_move})")
        };
        if rules.is_check() {
            text.push_str(&format!(", {to_move} is in check"));
        }
        return StatusText {
            text,
            game_over: false,
        };
    };

    let text = if rules.is_checkmate() {
        format!(
            "Checkmate! {} wins. Result: {result}",
            to_move.opponent()
        )
    } else if rules.is_draw() {
        format!("Game drawn. Result: {result}")
    } else {
        format!("Game over. Result: {result}")
    };
    StatusText {
        text,
        game_over: true,
    }
}
