//! Game module - local chess state and move orchestration
//!
//! # Architecture
//!
//! - [`rules`] - The [`Rules`] capability and its shakmaty-backed [`ChessRules`]
//! - [`session`] - `Idle` / `AwaitingReply` phase tracking with a submission permit
//! - [`status`] - Pure derivation of the status line from the rules engine
//! - [`orchestrator`] - [`MoveOrchestrator`], which drives a move from drag start
//!   to the service's verdict
//!
//! The rules engine is the single source of truth for the position. The board
//! only ever renders what the rules engine reports.

pub mod error;
pub mod orchestrator;
pub mod rules;
pub mod session;
pub mod status;
pub mod types;

pub use error::{GameError, GameResult};
pub use orchestrator::{DropOutcome, MoveOrchestrator, Resolution, HUMAN_SIDE};
pub use rules::{ChessRules, Rules};
pub use session::{MoveGate, SessionPhase, SubmissionPermit};
pub use status::{derive_status, StatusText};
pub use types::{AppliedMove, ProposedMove, Side};
