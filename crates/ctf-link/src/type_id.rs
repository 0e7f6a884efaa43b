//! The parent/child type id partition.
//!
//! A CTF container may have a parent container; the low 31 bits of a
//! [`TypeId`] hold a 1-based dense index, and the high bit says which
//! container's type table that index resolves in, *relative to whichever
//! container you are holding the id for*:
//!
//! - bit clear ("parent half"): the index resolves in the held container's
//!   parent, if it has one, otherwise in the held container itself (a
//!   container with no parent cannot have "its parent's" types).
//! - bit set ("child half"): the index resolves in the held container's own
//!   type table, never in its parent.
//!
//! This lets a single `u32` unambiguously name a type regardless of which of
//! two related containers (parent or child) is asking.

use serde::{Deserialize, Serialize};

/// A type id, scoped to whichever container it is paired with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    const CHILD_BIT: u32 = 0x8000_0000;

    /// Build an id from a 1-based dense index and a parent/child flag.
    pub fn index_to_id(index: u32, is_child_half: bool) -> Self {
        debug_assert_eq!(index & Self::CHILD_BIT, 0, "type index overflowed its 31 bits");
        if is_child_half {
            TypeId(index | Self::CHILD_BIT)
        } else {
            TypeId(index)
        }
    }

    /// The 1-based dense index, with the partition bit stripped.
    pub fn to_index(self) -> u32 {
        self.0 & !Self::CHILD_BIT
    }

    /// True if this id resolves in the held container's own type table.
    pub fn is_child_half(self) -> bool {
        self.0 & Self::CHILD_BIT != 0
    }

    /// The raw encoded value, for serialization or diagnostics.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Reconstruct an id from a previously obtained raw value.
    pub fn from_raw(v: u32) -> Self {
        TypeId(v)
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", if self.is_child_half() { "c" } else { "p" }, self.to_index())
    }
}
