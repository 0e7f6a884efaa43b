//! Error types for the link engine.

use thiserror::Error;

/// Errors that can occur while building, linking, or writing a CTF link.
#[derive(Debug, Error)]
pub enum LinkError {
    /// `add_ctf` was called after `link` had already produced output.
    ///
    /// Mirrors `ECTF_LINKADDEDLATE`: once the per-CU output registry exists,
    /// a later input could be placed ahead of inputs already folded into the
    /// shared output, silently reordering the link. Rejecting it outright is
    /// cheaper than trying to redo prior work.
    #[error("input added after link() already produced output")]
    AddedLate,

    /// A hash or table allocation failed.
    ///
    /// Kept for parity with the traced-from implementation's `ENOMEM`
    /// handling; under Rust's allocator, an actual allocation failure aborts
    /// the process rather than returning here, so this variant exists for
    /// API completeness rather than as something callers should expect to
    /// see.
    #[error("allocation failed")]
    OutOfMemory,

    /// Two same-named types in the same destination container have
    /// structurally different definitions and cannot share a type id.
    #[error("conflicting definition for shared type")]
    Conflict,

    /// A requested archive member name does not exist.
    #[error("no such archive member")]
    NoSuchName,

    /// A caller-supplied type or container id did not resolve to anything.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A requested share mode is recognized but not implemented.
    #[error("share mode not yet implemented")]
    NotYetImplemented,

    /// Failure encoding or decoding a container or archive's on-disk form.
    #[error("container or archive format error: {0}")]
    Format(String),

    /// An I/O failure while staging output (scratch files, archive assembly).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for LinkError {
    fn from(e: bincode::Error) -> Self {
        LinkError::Format(e.to_string())
    }
}

impl From<ctf_util::error::AtomError> for LinkError {
    fn from(e: ctf_util::error::AtomError) -> Self {
        LinkError::Format(e.to_string())
    }
}

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, LinkError>;
