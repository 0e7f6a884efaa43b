//! The registry of per-CU output containers, keyed by archive member name.
//!
//! Existing (even empty) is itself meaningful: once a link has run once,
//! [`crate::Linker::add_ctf`] refuses further inputs (see
//! [`crate::error::LinkError::AddedLate`]), since a later input could
//! otherwise land ahead of work already folded into the shared output.

use indexmap::IndexMap;

use crate::ids::ContainerId;

#[derive(Debug, Default)]
pub struct CuRegistry {
    initialized: bool,
    outputs: IndexMap<String, ContainerId>,
}

impl CuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn get(&self, name: &str) -> Option<ContainerId> {
        self.outputs.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, id: ContainerId) {
        self.outputs.insert(name.into(), id);
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ContainerId)> + '_ {
        self.outputs.iter().map(|(k, &v)| (k.as_str(), v))
    }
}
