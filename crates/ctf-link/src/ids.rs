//! Arena-level identifiers.
//!
//! [`ContainerId`] indexes the single arena a [`crate::Linker`] keeps for the
//! whole lifetime of a link: every input container, the shared output, and
//! every per-CU output container lives in the same [`ctf_util::IndexVec`].
//! Ids are never reused, so a [`ContainerId`] stays valid even after the
//! container it names has logically been "closed" by the caller.

use ctf_util::define_idx;

define_idx!(ContainerId);

/// The conventional name used for an archive's default (unambiguous) member.
pub const CTF_DEFAULT_MEMBER: &str = ".ctf";
