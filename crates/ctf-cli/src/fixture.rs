//! A JSON "fixture" format describing containers/archives to link.
//!
//! `ctf-link` deliberately has no object-file or CTF-binary reader (see its
//! crate docs); this module is this workspace's stand-in for one, so the CLI
//! has something to drive the link engine with. A fixture names, for each
//! input file, a default member and zero or more additional members, each a
//! flat list of types (referencing earlier types in the same member by
//! position) and variables (referencing one of those types the same way).

use std::collections::BTreeMap;

use ctf_link::{Archive, Linker, TypeId, TypeKind};
use serde::Deserialize;

use crate::error::{CliError, Result};

/// Top-level fixture: every input archive to register, plus the external
/// string-table pairs to intern afterward.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub inputs: Vec<FixtureInput>,
    #[serde(default)]
    pub strtab: Vec<(u32, String)>,
}

/// One input archive: a name (typically the path the real object file would
/// have come from) plus its members.
#[derive(Debug, Deserialize)]
pub struct FixtureInput {
    pub name: String,
    #[serde(default)]
    pub default: Option<FixtureMember>,
    #[serde(default)]
    pub members: BTreeMap<String, FixtureMember>,
}

/// One archive member: a container's types and variables, built in
/// declaration order.
#[derive(Debug, Deserialize)]
pub struct FixtureMember {
    #[serde(default)]
    pub types: Vec<FixtureType>,
    #[serde(default)]
    pub variables: Vec<(String, usize)>,
}

/// One type, with any ids it references expressed as 0-based indices into
/// this member's own `types` list (always a type declared earlier, since the
/// fixture has no forward-reference notion).
#[derive(Debug, Deserialize)]
pub struct FixtureType {
    pub name: Option<String>,
    pub kind: FixtureKind,
}

/// Mirrors [`ctf_link::types::TypeKind`] variant-for-variant, with every
/// `TypeId` field replaced by a `usize` index into the enclosing member's
/// `types` list.
#[derive(Debug, Deserialize)]
pub enum FixtureKind {
    Void,
    Integer { bits: u32, signed: bool },
    Float { bits: u32 },
    Pointer { target: usize },
    Typedef { target: usize },
    Struct { fields: Vec<(String, usize)> },
    Union { fields: Vec<(String, usize)> },
    Enum { variants: Vec<(String, i64)> },
    Forward,
}

/// Parse a fixture from its JSON text.
pub fn parse(json: &str) -> Result<Fixture> {
    Ok(serde_json::from_str(json)?)
}

/// Register every input in `fixture` against `linker`, returning nothing:
/// callers then call [`Linker::link`] themselves.
pub fn load_into(linker: &mut Linker, fixture: &Fixture) -> Result<()> {
    for input in &fixture.inputs {
        let mut archive = Archive::new();

        if let Some(member) = &input.default {
            let id = linker.new_input_container();
            build_member(linker, id, member, &input.name, "<default>")?;
            archive.set_default(id);
        }

        for (member_name, member) in &input.members {
            let id = linker.new_input_container();
            build_member(linker, id, member, &input.name, member_name)?;
            archive.add_member(member_name.clone(), id);
        }

        linker.add_ctf(input.name.clone(), archive)?;
    }

    Ok(())
}

fn build_member(
    linker: &mut Linker,
    container: ctf_link::ContainerId,
    member: &FixtureMember,
    input_name: &str,
    member_name: &str,
) -> Result<()> {
    let mut ids: Vec<TypeId> = Vec::with_capacity(member.types.len());

    for (i, fixture_type) in member.types.iter().enumerate() {
        let kind = resolve_kind(&fixture_type.kind, &ids, input_name, member_name, i)?;
        let id = linker.container_mut(container).define_type(fixture_type.name.as_deref(), kind);
        ids.push(id);
    }

    for (name, type_index) in &member.variables {
        let ty = *ids.get(*type_index).ok_or_else(|| {
            CliError::Fixture(format!(
                "{input_name}/{member_name}: variable {name} references out-of-range type index {type_index}"
            ))
        })?;
        linker.container_mut(container).define_variable(name, ty);
    }

    Ok(())
}

fn resolve_kind(
    kind: &FixtureKind,
    ids: &[TypeId],
    input_name: &str,
    member_name: &str,
    at: usize,
) -> Result<TypeKind> {
    let resolve = |index: usize| -> Result<TypeId> {
        ids.get(index).copied().ok_or_else(|| {
            CliError::Fixture(format!(
                "{input_name}/{member_name}: type #{at} references out-of-range type index {index}"
            ))
        })
    };

    Ok(match kind {
        FixtureKind::Void => TypeKind::Void,
        FixtureKind::Integer { bits, signed } => TypeKind::Integer { bits: *bits, signed: *signed },
        FixtureKind::Float { bits } => TypeKind::Float { bits: *bits },
        FixtureKind::Forward => TypeKind::Forward,
        FixtureKind::Enum { variants } => TypeKind::Enum { variants: variants.clone() },
        FixtureKind::Pointer { target } => TypeKind::Pointer { target: resolve(*target)? },
        FixtureKind::Typedef { target } => TypeKind::Typedef { target: resolve(*target)? },
        FixtureKind::Struct { fields } => TypeKind::Struct {
            fields: fields
                .iter()
                .map(|(name, idx)| Ok((name.clone(), resolve(*idx)?)))
                .collect::<Result<Vec<_>>>()?,
        },
        FixtureKind::Union { fields } => TypeKind::Union {
            fields: fields
                .iter()
                .map(|(name, idx)| Ok((name.clone(), resolve(*idx)?)))
                .collect::<Result<Vec<_>>>()?,
        },
    })
}

/// Build a `produce` closure for [`Linker::add_strtab`] from a fixture's
/// `strtab` list, draining it front-to-back.
pub fn strtab_producer(pairs: Vec<(u32, String)>) -> impl FnMut() -> Option<(u32, String)> {
    let mut iter = pairs.into_iter();
    move || iter.next()
}
