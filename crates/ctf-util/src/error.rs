//! Shared error types for the `ctf-util` crate.

use thiserror::Error;

/// Errors raised by [`crate::atoms::AtomTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtomError {
    /// An external string was registered at an offset that already holds a
    /// different string.
    #[error("external string offset {offset} already holds a different string")]
    OffsetConflict { offset: u32 },
}

/// Result type alias for atom table operations.
pub type AtomResult<T> = std::result::Result<T, AtomError>;
