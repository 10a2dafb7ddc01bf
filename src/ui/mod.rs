//! UI module - board surfaces
//!
//! - **board**: [`BoardSurface`], the narrow interface the orchestrator renders through
//! - **terminal**: [`TerminalBoard`], a plain text surface for the interactive binary

pub mod board;
pub mod terminal;

pub use board::BoardSurface;
pub use terminal::TerminalBoard;
