//! ctf-util - Foundational types shared across the CTF link workspace.
//!
//! This crate has no knowledge of CTF containers, archives, or linking; it
//! only provides the small, generic building blocks that the higher-level
//! `ctf-link` crate assembles into the actual linker:
//!
//! - [`index_vec`]: a typed-index arena vector (`IndexVec<I, T>`), used for
//!   the container arena, and for each container's own type and variable
//!   tables.
//! - [`atoms`]: a per-container string interner with external-string
//!   support.
//! - [`error`]: error types for the above.

pub mod atoms;
pub mod error;
pub mod index_vec;

pub use atoms::{AtomId, AtomTable};
pub use index_vec::{Idx, IndexVec};
