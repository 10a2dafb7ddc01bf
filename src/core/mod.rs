//! Core module - application infrastructure
//!
//! - [`settings`] - [`ClientSettings`], persisted as JSON in the user's config directory
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - [`CoreError`] for settings persistence

pub mod error;
pub mod logging;
pub mod settings;

pub use error::{CoreError, CoreResult};
pub use settings::ClientSettings;
