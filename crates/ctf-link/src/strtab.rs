//! External string interning: attribute offsets into a caller-owned symbol
//! string table to whichever output containers reference them.

use crate::error::{LinkError, Result};
use crate::linker::Linker;

/// Drain `produce` of `(offset, string)` pairs, registering each with the
/// shared output and every per-CU output.
///
/// `produce` stands in for iterating a symbol table the caller owns (this
/// crate has no symbol-table reader of its own); it returns `None` once
/// exhausted.
pub(crate) fn add_strtab<F>(linker: &mut Linker, mut produce: F) -> Result<()>
where
    F: FnMut() -> Option<(u32, String)>,
{
    let mut first_err: Option<LinkError> = None;

    while let Some((offset, s)) = produce() {
        let out = linker.out();
        if let Err(e) = linker.container_mut(out).str_add_external(&s, offset) {
            let e = LinkError::from(e);
            log::warn!("error interning external string at offset {offset}: {e}");
            first_err.get_or_insert(e);
        }

        let cu_names: Vec<String> = linker.cu_outputs().iter().map(|(n, _)| n.to_string()).collect();
        for name in cu_names {
            let Some(id) = linker.cu_outputs().get(&name) else { continue };
            if let Err(e) = linker.container_mut(id).str_add_external(&s, offset) {
                let e = LinkError::from(e);
                log::warn!("error interning external string at offset {offset} for CU {name}: {e}");
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
