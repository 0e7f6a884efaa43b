//! An input archive: a default member plus zero or more named members, each
//! a [`crate::ids::ContainerId`] into the link arena.

use indexmap::IndexMap;

use crate::ids::{ContainerId, CTF_DEFAULT_MEMBER};

/// A bundle of containers as registered with [`crate::Linker::add_ctf`].
///
/// Mirrors a CTF archive: a single default member (the common case, one
/// translation unit's container with no ambiguity about which member a
/// caller means), plus any number of additional named members, typically
/// used when several translation units were linked into one archive
/// upstream and each needs to stay distinguishable.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    default: Option<ContainerId>,
    members: IndexMap<String, ContainerId>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default(&mut self, id: ContainerId) {
        self.default = Some(id);
    }

    pub fn add_member(&mut self, name: impl Into<String>, id: ContainerId) {
        self.members.insert(name.into(), id);
    }

    pub fn default_member(&self) -> Option<ContainerId> {
        self.default
    }

    pub fn member(&self, name: &str) -> Option<ContainerId> {
        if name == CTF_DEFAULT_MEMBER {
            self.default
        } else {
            self.members.get(name).copied()
        }
    }

    /// Every member, default first (under [`CTF_DEFAULT_MEMBER`]), then named
    /// members in registration order.
    pub fn iter_members(&self) -> impl Iterator<Item = (&str, ContainerId)> + '_ {
        self.default
            .map(|id| (CTF_DEFAULT_MEMBER, id))
            .into_iter()
            .chain(self.members.iter().map(|(n, &id)| (n.as_str(), id)))
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.members.is_empty()
    }
}
