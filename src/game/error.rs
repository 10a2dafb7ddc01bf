//! Error types for game module
//!
//! Provides custom error types for the local rules engine: move validation,
//! notation parsing, position loading, and history rollback.

/// Errors that can occur in game logic
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Move is not legal in the current position
    #[error("Illegal move: {notation}")]
    IllegalMove { notation: String },

    /// Move text could not be parsed as UCI or SAN
    #[error("Invalid move notation: {notation}")]
    InvalidMoveNotation { notation: String },

    /// FEN could not be parsed or describes an impossible position
    #[error("Invalid position: {message}")]
    InvalidPosition { message: String },

    /// Undo requested with an empty move history
    #[error("No move to undo")]
    NothingToUndo,
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
