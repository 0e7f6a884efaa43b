//! A single CTF container: a type table, a variable table, and a string
//! atom table, optionally parented to another container in the same arena.

use ctf_util::{define_idx, AtomTable, Idx, IndexVec};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};
use crate::ids::ContainerId;
use crate::type_id::TypeId;
use crate::type_map::{self, TypeMapping};
use crate::types::{TypeDef, TypeKind};

define_idx!(LocalTypeIndex);

/// One container in the link arena: an input, the shared output, or a
/// per-CU child of the shared output.
#[derive(Debug, Clone)]
pub struct Container {
    parent: Option<ContainerId>,
    cu_name: Option<String>,
    types: IndexVec<LocalTypeIndex, TypeDef>,
    type_by_name: FxHashMap<String, LocalTypeIndex>,
    variables: IndexMap<String, TypeId>,
    atoms: AtomTable,
    type_mapping: Option<TypeMapping>,
    dirty: bool,
}

impl Container {
    /// A fresh container with no parent: either a freestanding input, or the
    /// shared output root.
    pub fn new_root() -> Self {
        Self {
            parent: None,
            cu_name: None,
            types: IndexVec::new(),
            type_by_name: FxHashMap::default(),
            variables: IndexMap::new(),
            atoms: AtomTable::new(),
            type_mapping: None,
            dirty: false,
        }
    }

    /// A fresh container parented to `parent`: a per-CU output, or a
    /// non-default archive member imported against its archive's default.
    pub fn new_child(parent: ContainerId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new_root()
        }
    }

    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: ContainerId) {
        self.parent = Some(parent);
    }

    pub fn cu_name(&self) -> Option<&str> {
        self.cu_name.as_deref()
    }

    pub fn set_cu_name(&mut self, name: impl Into<String>) {
        self.cu_name = Some(name.into());
    }

    pub(crate) fn type_mapping(&self) -> Option<&TypeMapping> {
        self.type_mapping.as_ref()
    }

    pub(crate) fn type_mapping_mut(&mut self) -> &mut Option<TypeMapping> {
        &mut self.type_mapping
    }

    /// Append a type without deduplication. Used to populate an input
    /// container directly, standing in for a CTF-binary or object-file
    /// reader, which this crate does not implement.
    pub fn define_type(&mut self, name: Option<&str>, kind: TypeKind) -> TypeId {
        let local = self.types.push(TypeDef { name: name.map(str::to_string), kind });
        let id = TypeId::index_to_id(local.index() as u32 + 1, self.parent.is_some());
        if let Some(name) = name {
            self.type_by_name.insert(name.to_string(), local);
        }
        id
    }

    /// Record a variable directly in this container, bypassing the link
    /// engine's name-conflict handling. Used for building input fixtures.
    pub fn define_variable(&mut self, name: &str, ty: TypeId) {
        self.atoms.intern(name);
        self.variables.insert(name.to_string(), ty);
    }

    pub fn add_variable(&mut self, name: &str, ty: TypeId) {
        self.atoms.intern(name);
        self.variables.insert(name.to_string(), ty);
        self.dirty = true;
    }

    pub fn variable(&self, name: &str) -> Option<TypeId> {
        self.variables.get(name).copied()
    }

    pub fn str_add_external(&mut self, s: &str, offset: u32) -> std::result::Result<(), ctf_util::error::AtomError> {
        self.dirty = true;
        self.atoms.register_external(offset, s)
    }

    pub fn resolve_external_string(&self, offset: u32) -> Option<&str> {
        self.atoms.resolve_external(offset)
    }

    /// Mark the container clean, as if its in-memory state had just been
    /// flushed to storage. A no-op beyond the flag, since this container
    /// never has out-of-band storage to flush to.
    pub fn update(&mut self) {
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Look up a named type's id, if this container defines one under that
    /// name directly (not via its parent).
    pub fn type_id_by_name(&self, name: &str) -> Option<TypeId> {
        let local = *self.type_by_name.get(name)?;
        Some(TypeId::index_to_id(local.index() as u32 + 1, self.parent.is_some()))
    }

    pub fn type_def(&self, index1: u32) -> Option<&TypeDef> {
        self.types.get(LocalTypeIndex::from_usize(index1.checked_sub(1)? as usize))
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// All type ids owned by this container, in insertion order.
    pub fn iter_type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        let is_child = self.parent.is_some();
        (0..self.types.len()).map(move |i| TypeId::index_to_id(i as u32 + 1, is_child))
    }

    /// All `(name, type)` variable pairs, in insertion order.
    pub fn iter_variables(&self) -> impl Iterator<Item = (&str, TypeId)> + '_ {
        self.variables.iter().map(|(n, &t)| (n.as_str(), t))
    }

    fn next_id(&self) -> TypeId {
        TypeId::index_to_id(self.types.len() as u32 + 1, self.parent.is_some())
    }
}

/// Fold the type named by `(src, src_id)` into `dst`, recursing into any
/// referenced types first, and return the id it now has in `dst`.
///
/// If `dst` already has a type of the same name whose (already-translated)
/// structure differs, this returns [`LinkError::Conflict`] without mutating
/// `dst`'s type-by-name table; any anonymous or nested types discovered
/// along the way may still have been folded in, since those cannot conflict
/// by name.
pub fn add_type(
    arena: &mut IndexVec<ContainerId, Container>,
    dst: ContainerId,
    src: ContainerId,
    src_id: TypeId,
) -> Result<TypeId> {
    if let Some((_, existing)) = type_map::lookup(arena, src, src_id, dst) {
        return Ok(existing);
    }

    let (src_c, src_i) = type_map::normalize(arena, src, src_id);
    let def = arena[src_c]
        .type_def(src_i)
        .cloned()
        .ok_or_else(|| LinkError::InvalidArgument(format!("type id {src_id} out of range in source container")))?;

    let translated_kind = translate_kind(arena, dst, src_c, &def.kind)?;

    if let Some(name) = &def.name {
        if let Some(&existing_local) = arena[dst].type_by_name.get(name) {
            let same = arena[dst].types[existing_local].kind == translated_kind;
            if same {
                let existing_id = TypeId::index_to_id(existing_local.index() as u32 + 1, arena[dst].parent.is_some());
                type_map::record(arena, src, src_id, dst, existing_id);
                return Ok(existing_id);
            }
            return Err(LinkError::Conflict);
        }
    }

    let new_id = arena[dst].next_id();
    let local = arena[dst].types.push(TypeDef { name: def.name.clone(), kind: translated_kind });
    debug_assert_eq!(new_id.to_index() as usize, local.index() + 1);
    if let Some(name) = &def.name {
        arena[dst].type_by_name.insert(name.clone(), local);
    }
    arena[dst].dirty = true;

    type_map::record(arena, src, src_id, dst, new_id);
    Ok(new_id)
}

fn translate_kind(
    arena: &mut IndexVec<ContainerId, Container>,
    dst: ContainerId,
    src: ContainerId,
    kind: &TypeKind,
) -> Result<TypeKind> {
    Ok(match kind {
        TypeKind::Void => TypeKind::Void,
        TypeKind::Integer { bits, signed } => TypeKind::Integer { bits: *bits, signed: *signed },
        TypeKind::Float { bits } => TypeKind::Float { bits: *bits },
        TypeKind::Forward => TypeKind::Forward,
        TypeKind::Enum { variants } => TypeKind::Enum { variants: variants.clone() },
        TypeKind::Pointer { target } => TypeKind::Pointer { target: add_type(arena, dst, src, *target)? },
        TypeKind::Typedef { target } => TypeKind::Typedef { target: add_type(arena, dst, src, *target)? },
        TypeKind::Struct { fields } => TypeKind::Struct {
            fields: fields
                .iter()
                .map(|(name, t)| Ok((name.clone(), add_type(arena, dst, src, *t)?)))
                .collect::<Result<Vec<_>>>()?,
        },
        TypeKind::Union { fields } => TypeKind::Union {
            fields: fields
                .iter()
                .map(|(name, t)| Ok((name.clone(), add_type(arena, dst, src, *t)?)))
                .collect::<Result<Vec<_>>>()?,
        },
    })
}

/// Snapshot of a container's contents suitable for serialization.
///
/// Kept separate from [`Container`] itself so that `ctf-util`'s arena and
/// atom types never need to implement `serde` traits of their own.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub parent: Option<u32>,
    pub cu_name: Option<String>,
    pub types: Vec<TypeDef>,
    pub variables: Vec<(String, u32)>,
    pub external_strings: Vec<(u32, String)>,
}

impl Container {
    pub fn to_snapshot(&self) -> ContainerSnapshot {
        ContainerSnapshot {
            parent: self.parent.map(|p| p.0),
            cu_name: self.cu_name.clone(),
            types: self.types.as_slice().to_vec(),
            variables: self.variables.iter().map(|(n, t)| (n.clone(), t.raw())).collect(),
            external_strings: self.atoms.external_pairs(),
        }
    }
}
