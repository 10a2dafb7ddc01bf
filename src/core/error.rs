//! Error types for core module
//!
//! Settings failures keep the path they were about, since the settings file
//! location is platform dependent and otherwise hard to find.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings file could not be read
    #[error("cannot read settings at {}: {source}", path.display())]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Settings file or its directory could not be written
    #[error("cannot write settings at {}: {source}", path.display())]
    SettingsWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Settings file is not valid settings JSON
    #[error("malformed settings at {}: {source}", path.display())]
    SettingsFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
