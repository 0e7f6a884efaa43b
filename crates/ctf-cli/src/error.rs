//! Error handling for the `ctf-link` CLI front-end.
//!
//! Mirrors the layering used throughout the workspace: a `thiserror` enum
//! here, with `anyhow` reserved for `main`, where heterogeneous errors from
//! this crate and `ctf-link` need a single user-facing message.

use thiserror::Error;

/// Errors raised while loading fixtures, config, or driving the linker from
/// the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// A fixture or config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fixture's JSON was malformed or referenced an out-of-range type.
    #[error("invalid fixture: {0}")]
    Fixture(String),

    /// A config file's TOML was malformed.
    #[error("invalid config: {0}")]
    Config(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The link engine itself reported a failure.
    #[error(transparent)]
    Link(#[from] ctf_link::LinkError),
}

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, CliError>;
