//! Networking module - talking to the StockZero move service
//!
//! - [`protocol`] - Request and reply payloads, engine endpoint selection
//! - [`cookies`] - Cookie header lookup for the CSRF token
//! - [`client`] - [`ArbitrationService`] and its HTTP implementation [`HttpArbiter`]
//! - [`error`] - Transport-level failures

pub mod client;
pub mod cookies;
pub mod error;
pub mod protocol;

pub use client::{ArbitrationService, HttpArbiter};
pub use error::{NetworkError, NetworkResult};
pub use protocol::{EngineMode, MoveReply, MoveRequest};
