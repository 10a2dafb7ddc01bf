//! StockZero board client.
//!
//! Keeps a local chess position in step with the remote StockZero move
//! service. The [`game::MoveOrchestrator`] sits between the rules engine, the
//! board surface and the arbitration service, applying the player's move
//! optimistically and reconciling it with the service's verdict.

pub mod core;
pub mod game;
pub mod networking;
pub mod ui;

pub use game::{DropOutcome, MoveOrchestrator, Resolution};
