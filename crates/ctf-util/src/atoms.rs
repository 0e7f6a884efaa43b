//! A per-container string interner — the "atom table" of a CTF container.
//!
//! Unlike `faxc-util`'s global, thread-safe [`StringTable`] (which serves a
//! whole compiler session from any thread via `DashMap`), every container in
//! this workspace owns its own `AtomTable`. The link engine is single-threaded
//! and cooperative (see the concurrency section of the crate docs), so there
//! is nothing to gain from a concurrent interner here, and a lot to lose in
//! complexity: a plain `HashMap` behind `&mut self` is both simpler and
//! faster for this access pattern.
//!
//! `AtomTable` also tracks *external* strings: strings whose storage lives in
//! a table the container does not own (the symbol string table supplied to
//! [`crate::index_vec`]'s sibling crate `ctf-link`'s string interner pass).
//! These are addressed by a caller-supplied offset rather than by a dense
//! index.

use rustc_hash::FxHashMap;

use crate::define_idx;
use crate::error::{AtomError, AtomResult};
use crate::index_vec::IndexVec;

define_idx!(AtomId);

/// A per-container interner of locally-owned strings plus a side table of
/// externally-owned strings addressed by offset.
#[derive(Debug, Default, Clone)]
pub struct AtomTable {
    atoms: IndexVec<AtomId, String>,
    by_value: FxHashMap<String, AtomId>,
    external: FxHashMap<u32, String>,
}

impl AtomTable {
    /// Create an empty atom table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning the same [`AtomId`] for repeated values.
    pub fn intern(&mut self, s: &str) -> AtomId {
        if let Some(&id) = self.by_value.get(s) {
            return id;
        }
        let id = self.atoms.push(s.to_string());
        self.by_value.insert(s.to_string(), id);
        id
    }

    /// Resolve a previously interned atom back to its string.
    pub fn resolve(&self, id: AtomId) -> &str {
        &self.atoms[id]
    }

    /// Number of locally-interned atoms.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// True if no atoms (local or external) have been recorded.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty() && self.external.is_empty()
    }

    /// Register `s` as living at `offset` in an external string table.
    ///
    /// Re-registering the same `(offset, s)` pair is a no-op. Registering a
    /// different string at an offset that already holds one is an error:
    /// offsets into the symbol string table are assumed stable for the
    /// lifetime of a link.
    pub fn register_external(&mut self, offset: u32, s: &str) -> AtomResult<()> {
        match self.external.get(&offset) {
            Some(existing) if existing == s => Ok(()),
            Some(_) => Err(AtomError::OffsetConflict { offset }),
            None => {
                self.external.insert(offset, s.to_string());
                Ok(())
            }
        }
    }

    /// Resolve a string previously registered at `offset`.
    pub fn resolve_external(&self, offset: u32) -> Option<&str> {
        self.external.get(&offset).map(String::as_str)
    }

    /// All registered `(offset, string)` pairs, in arbitrary order.
    ///
    /// Intended for snapshotting a table for serialization; callers that
    /// need a stable order should sort the result themselves.
    pub fn external_pairs(&self) -> Vec<(u32, String)> {
        self.external.iter().map(|(&k, v)| (k, v.clone())).collect()
    }
}
