//! Rules engine capability
//!
//! The orchestrator only needs a narrow slice of a rules engine: play and
//! take back moves, report whose turn it is and whether the game has ended,
//! and serialize the position. [`Rules`] names that slice; [`ChessRules`]
//! implements it on top of shakmaty.
//!
//! # Draw detection
//!
//! [`ChessRules::is_draw`] matches what a browser-side rules library reports:
//! stalemate, insufficient material, the fifty-move rule, and threefold
//! repetition. Repetition is counted over the positions kept for undo, so a
//! position loaded from FEN starts with no repetition history.

use crate::game::error::{GameError, GameResult};
use crate::game::types::{AppliedMove, ProposedMove, Side};
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position};

/// Rules capability consulted and mutated by the orchestrator
pub trait Rules: Send {
    /// Play a board move; fails without touching the position if illegal.
    fn apply_move(&mut self, mv: &ProposedMove) -> GameResult<AppliedMove>;

    /// Play a move given as text (UCI, or SAN as a fallback).
    fn apply_notation(&mut self, notation: &str) -> GameResult<AppliedMove>;

    /// Take back the last move, restoring the exact prior position.
    fn undo_last(&mut self) -> GameResult<AppliedMove>;

    fn turn(&self) -> Side;
    fn is_check(&self) -> bool;
    fn is_checkmate(&self) -> bool;
    fn is_draw(&self) -> bool;

    fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    /// Current position in FEN.
    fn position_notation(&self) -> String;

    /// Back to the standard starting position with no history.
    fn reset(&mut self);
}

/// Plies without capture or pawn move after which the game is drawn
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// shakmaty-backed rules engine
#[derive(Debug, Clone, Default)]
pub struct ChessRules {
    position: Chess,
    /// Position before each played move, paired with that move
    history: Vec<(Chess, AppliedMove)>,
}

impl ChessRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary position
    pub fn from_fen(fen: &str) -> GameResult<Self> {
        let parsed: Fen = fen.parse().map_err(|e: shakmaty::fen::ParseFenError| {
            GameError::InvalidPosition {
                message: e.to_string(),
            }
        })?;
        let position: Chess =
            parsed
                .into_position(CastlingMode::Standard)
                .map_err(|e| GameError::InvalidPosition {
                    message: e.to_string(),
                })?;
        Ok(Self {
            position,
            history: Vec::new(),
        })
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// Moves played since the start (or since the loaded FEN)
    pub fn moves(&self) -> impl Iterator<Item = &AppliedMove> {
        self.history.iter().map(|(_, mv)| mv)
    }

    fn play(&mut self, m: &Move) -> AppliedMove {
        let applied = AppliedMove {
            uci: m.to_uci(CastlingMode::Standard).to_string(),
            san: San::from_move(&self.position, m).to_string(),
        };
        let prior = self.position.clone();
        self.position.play_unchecked(m);
        self.history.push((prior, applied.clone()));
        applied
    }

    /// Number of times the current position has occurred, counting now.
    fn repetitions(&self) -> usize {
        let current = repetition_key(&self.position);
        1 + self
            .history
            .iter()
            .filter(|(prior, _)| repetition_key(prior) == current)
            .count()
    }
}

/// FEN without the move counters: placement, turn, castling, en passant.
fn repetition_key(position: &Chess) -> String {
    let fen = Fen::from_position(position.clone(), EnPassantMode::Legal).to_string();
    fen.rsplitn(3, ' ').nth(2).unwrap_or_default().to_string()
}

impl Rules for ChessRules {
    fn apply_move(&mut self, mv: &ProposedMove) -> GameResult<AppliedMove> {
        // Board drops name the king's destination for castling, which is
        // exactly the standard UCI encoding.
        let found = self
            .position
            .legal_moves()
            .into_iter()
            .filter(|m| match m.to_uci(CastlingMode::Standard) {
                UciMove::Normal { from, to, .. } => from == mv.from && to == mv.to,
                _ => false,
            })
            .find(|m| m.promotion().map_or(true, |role| role == mv.promotion));

        match found {
            Some(m) => Ok(self.play(&m)),
            None => Err(GameError::IllegalMove {
                notation: mv.to_string(),
            }),
        }
    }

    fn apply_notation(&mut self, notation: &str) -> GameResult<AppliedMove> {
        let illegal = || GameError::IllegalMove {
            notation: notation.to_string(),
        };
        let m = if let Ok(uci) = notation.parse::<UciMove>() {
            uci.to_move(&self.position).map_err(|_| illegal())?
        } else if let Ok(san) = notation.parse::<San>() {
            san.to_move(&self.position).map_err(|_| illegal())?
        } else {
            return Err(GameError::InvalidMoveNotation {
                notation: notation.to_string(),
            });
        };
        Ok(self.play(&m))
    }

    fn undo_last(&mut self) -> GameResult<AppliedMove> {
        let (prior, mv) = self.history.pop().ok_or(GameError::NothingToUndo)?;
        self.position = prior;
        Ok(mv)
    }

    fn turn(&self) -> Side {
        self.position.turn().into()
    }

    fn is_check(&self) -> bool {
        self.position.is_check()
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_draw(&self) -> bool {
        self.position.is_stalemate()
            || self.position.is_insufficient_material()
            || self.position.halfmoves() >= FIFTY_MOVE_HALFMOVES
            || self.repetitions() >= 3
    }

    fn position_notation(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    fn reset(&mut self) {
        self.position = Chess::default();
        self.history.clear();
    }
}
