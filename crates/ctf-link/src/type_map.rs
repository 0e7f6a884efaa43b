//! The type-mapping index: "this input type has already been folded into
//! that destination type" memoization, per destination container.
//!
//! Every destination container (the shared output, and each per-CU child)
//! carries its own mapping table, built lazily on first insert. A mapping
//! key identifies a *source* type id, always normalized to resolve relative
//! to the container it is actually stored against, so that a parent-half id
//! handed in by two different children ends up keyed identically.

use ctf_util::IndexVec;
use rustc_hash::FxHashMap;

use crate::container::Container;
use crate::ids::ContainerId;
use crate::type_id::TypeId;

/// A normalized `(container, index)` pair used as a type-mapping key.
#[derive(Clone, Copy, Debug, Eq)]
pub struct MapKey {
    pub container: ContainerId,
    pub index: u32,
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container && self.index == other.index
    }
}

impl std::hash::Hash for MapKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        let c = self.container.0 as u64;
        let i = self.index as u64;
        let mixed = c.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(31) ^ i.wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        mixed.hash(state);
    }
}

/// The per-container mapping table: source [`MapKey`] to destination index.
pub type TypeMapping = FxHashMap<MapKey, u32>;

/// Resolve `(holder, id)` to the container the id actually names plus the
/// 1-based index within that container's type table.
///
/// A parent-half id re-hosts to `holder`'s parent, if one exists; a
/// child-half id (or an id held by a container with no parent) stays put.
pub fn normalize(arena: &IndexVec<ContainerId, Container>, holder: ContainerId, id: TypeId) -> (ContainerId, u32) {
    if !id.is_child_half() {
        if let Some(parent) = arena[holder].parent() {
            return (parent, id.to_index());
        }
    }
    (holder, id.to_index())
}

/// Record that `(src, src_id)`, read through `src`, maps to `(dst, dst_id)`.
pub fn record(
    arena: &mut IndexVec<ContainerId, Container>,
    src: ContainerId,
    src_id: TypeId,
    dst: ContainerId,
    dst_id: TypeId,
) {
    let (src_c, src_i) = normalize(arena, src, src_id);
    let (dst_c, dst_i) = normalize(arena, dst, dst_id);
    let key = MapKey { container: src_c, index: src_i };
    arena[dst_c]
        .type_mapping_mut()
        .get_or_insert_with(TypeMapping::default)
        .insert(key, dst_i);
}

/// Look up a previously recorded mapping for `(src, src_id)` against `dst`,
/// falling back to `dst`'s parent on a miss.
///
/// On success, returns the container the mapping was actually found in
/// (`dst` or its parent) together with an id that resolves correctly when
/// held by `dst` itself.
pub fn lookup(
    arena: &IndexVec<ContainerId, Container>,
    src: ContainerId,
    src_id: TypeId,
    dst: ContainerId,
) -> Option<(ContainerId, TypeId)> {
    let (src_c, src_i) = normalize(arena, src, src_id);
    let key = MapKey { container: src_c, index: src_i };

    if let Some(map) = arena[dst].type_mapping() {
        if let Some(&idx) = map.get(&key) {
            return Some((dst, TypeId::index_to_id(idx, arena[dst].parent().is_some())));
        }
    }

    if let Some(parent) = arena[dst].parent() {
        if let Some(map) = arena[parent].type_mapping() {
            if let Some(&idx) = map.get(&key) {
                return Some((parent, TypeId::index_to_id(idx, arena[parent].parent().is_some())));
            }
        }
    }

    None
}
