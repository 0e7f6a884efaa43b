//! The link engine: folds every registered input into the shared output,
//! splitting per-CU children wherever a name collides with a different
//! definition.

use crate::container::{self, Container};
use crate::error::{LinkError, Result};
use crate::ids::{ContainerId, CTF_DEFAULT_MEMBER};
use crate::linker::Linker;
use crate::type_id::TypeId;
use crate::type_map;

/// How to resolve a name that two inputs define differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMode {
    /// Share a name across inputs only while every definition agrees;
    /// conflicting definitions are split into per-CU children. The only
    /// mode this engine implements.
    Unconflicted,
    /// Keep every conflicting definition, deduplicating only exact repeats.
    /// Declared for API completeness; not implemented.
    Duplicated,
}

pub(crate) fn link(linker: &mut Linker, mode: ShareMode) -> Result<()> {
    linker.cu_outputs_mut().mark_initialized();

    if mode != ShareMode::Unconflicted {
        return Err(LinkError::NotYetImplemented);
    }

    let inputs: Vec<(String, crate::archive::Archive)> =
        linker.inputs().iter().map(|(n, a)| (n.to_string(), a.clone())).collect();

    let mut first_err = None;
    for (file_name, archive) in &inputs {
        if let Err(e) = link_one_input_archive(linker, file_name, archive) {
            log::warn!("error linking input archive {file_name}: {e}");
            if first_err.is_none() {
                first_err = Some(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn link_one_input_archive(linker: &mut Linker, file_name: &str, archive: &crate::archive::Archive) -> Result<()> {
    let out = linker.out();
    let mut done_main_member = false;
    let main_input = archive.default_member();

    if let Some(main_id) = main_input {
        let arcname = format!("{CTF_DEFAULT_MEMBER}.{file_name}");
        link_one_member(linker, out, file_name, main_id, &arcname, file_name, false)?;
        done_main_member = true;
    } else {
        log::debug!("input {file_name} has no default member; linking named members only");
    }

    let mut member_err = None;
    for (name, member_id) in archive.iter_members() {
        if name == CTF_DEFAULT_MEMBER {
            if done_main_member {
                continue;
            }
            let arcname = format!("{CTF_DEFAULT_MEMBER}.{file_name}");
            if let Err(e) = link_one_member(linker, out, file_name, member_id, &arcname, file_name, false) {
                member_err = Some(e);
            }
            done_main_member = true;
            continue;
        }

        if let Some(main_id) = main_input {
            linker.container_mut(member_id).set_parent(main_id);
        }

        let cu_name = name.strip_prefix(&format!("{CTF_DEFAULT_MEMBER}.")).unwrap_or(name);
        if let Err(e) = link_one_member(linker, out, file_name, member_id, name, cu_name, true) {
            member_err = Some(e);
        }
    }

    match member_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[allow(clippy::too_many_arguments)]
fn link_one_member(
    linker: &mut Linker,
    out: ContainerId,
    file_name: &str,
    in_fp: ContainerId,
    arcname: &str,
    cu_name: &str,
    in_input_cu_file: bool,
) -> Result<()> {
    let type_ids: Vec<TypeId> = linker.container(in_fp).iter_type_ids().collect();
    for t in type_ids {
        link_one_type(linker, out, in_fp, t, arcname, cu_name, in_input_cu_file, file_name)?;
    }

    let var_out = if in_input_cu_file {
        linker.cu_outputs().get(arcname).unwrap_or(out)
    } else {
        out
    };

    let vars: Vec<(String, TypeId)> = linker.container(in_fp).iter_variables().map(|(n, t)| (n.to_string(), t)).collect();
    for (name, ty) in vars {
        link_one_variable(linker, var_out, in_fp, &name, ty, arcname, file_name)?;
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn link_one_type(
    linker: &mut Linker,
    out: ContainerId,
    in_fp: ContainerId,
    t: TypeId,
    arcname: &str,
    cu_name: &str,
    in_input_cu_file: bool,
    file_name: &str,
) -> Result<()> {
    if !in_input_cu_file {
        match container::add_type(linker.arena_mut(), out, in_fp, t) {
            Ok(_) => return Ok(()),
            Err(LinkError::Conflict) => {}
            Err(e) => {
                log::warn!("error linking type {t} from {file_name}: {e}");
                return Err(e);
            }
        }
    }

    let per_cu = match linker.cu_outputs().get(arcname) {
        Some(id) => id,
        None => {
            let id = linker.arena_mut().push(Container::new_child(out));
            linker.container_mut(id).set_cu_name(cu_name);
            linker.cu_outputs_mut().insert(arcname.to_string(), id);
            id
        }
    };

    container::add_type(linker.arena_mut(), per_cu, in_fp, t).map(|_| ()).map_err(|e| {
        log::error!("type {t} from {arcname} in {file_name} could not be placed even in its per-CU output: {e}");
        e
    })
}

fn link_one_variable(
    linker: &mut Linker,
    out: ContainerId,
    in_fp: ContainerId,
    name: &str,
    ty: TypeId,
    arcname: &str,
    file_name: &str,
) -> Result<()> {
    if let Some(parent) = linker.container(out).parent() {
        if let Some((_, mapped)) = type_map::lookup(linker.arena(), in_fp, ty, parent) {
            if let Some(existing) = linker.container(parent).variable(name) {
                if existing == mapped {
                    return Ok(());
                }
                // Name collides with a different mapping already in the
                // parent: keep this one local to `out`, referencing the type
                // where it actually lives (the parent) via a parent-half id
                // rather than copying the type into `out` itself.
                let parent_half_ref = TypeId::index_to_id(mapped.to_index(), false);
                debug_assert_eq!(type_map::normalize(linker.arena(), out, parent_half_ref).0, parent);
                linker.container_mut(out).add_variable(name, parent_half_ref);
                return Ok(());
            }
            linker.container_mut(parent).add_variable(name, mapped);
            return Ok(());
        }
    }

    if let Some((_, mapped)) = type_map::lookup(linker.arena(), in_fp, ty, out) {
        linker.container_mut(out).add_variable(name, mapped);
        return Ok(());
    }

    log::error!(
        "variable {name} (type {ty}) from member {arcname} in {file_name} has no known mapping in parent or child"
    );
    Err(LinkError::InvalidArgument(format!("unmapped type for variable {name}")))
}
