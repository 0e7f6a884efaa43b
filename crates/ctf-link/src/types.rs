//! The shape of a CTF type, as held inside one container.

use serde::{Deserialize, Serialize};

use crate::type_id::TypeId;

/// A named or anonymous type definition.
///
/// Type ids embedded in `kind` (struct/union members, pointer and typedef
/// targets) are always scoped to the container that owns this `TypeDef`:
/// see [`TypeId`] for what "scoped" means.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: Option<String>,
    pub kind: TypeKind,
}

/// The handful of type kinds this linker core understands.
///
/// Real CTF has a larger catalog (slices, restricted types, function types,
/// array types); it is intentionally not reproduced here; folding in an
/// unmodeled kind is a caller error, not a kind this enum needs to represent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    Void,
    Integer { bits: u32, signed: bool },
    Float { bits: u32 },
    Pointer { target: TypeId },
    Typedef { target: TypeId },
    Struct { fields: Vec<(String, TypeId)> },
    Union { fields: Vec<(String, TypeId)> },
    Enum { variants: Vec<(String, i64)> },
    /// A forward declaration: a name with no body yet.
    Forward,
}
