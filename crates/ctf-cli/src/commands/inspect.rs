//! `ctf-link inspect` - print a written container or archive's contents as
//! JSON, for debugging a fixture or a link result without a hex dump.

use std::path::PathBuf;

use ctf_link::{read_archive_toc, read_container, LinkError};
use serde::Serialize;

use crate::error::Result;

/// Arguments for the `inspect` subcommand.
#[derive(Debug, Clone)]
pub struct InspectArgs {
    /// Path to a blob written by `ctf-link link` (or [`ctf_link::Linker::write`]).
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
struct MemberReport {
    name: String,
    cu_name: Option<String>,
    type_count: usize,
    variable_count: usize,
    external_string_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Report {
    Archive { members: Vec<MemberReport> },
    Container(MemberReport),
}

fn summarize(name: &str, blob: &[u8]) -> Result<MemberReport> {
    let snapshot = read_container(blob)?;
    Ok(MemberReport {
        name: name.to_string(),
        cu_name: snapshot.cu_name,
        type_count: snapshot.types.len(),
        variable_count: snapshot.variables.len(),
        external_string_count: snapshot.external_strings.len(),
    })
}

/// Run the `inspect` subcommand: decode `args.path` and print a JSON summary
/// of every member it contains to stdout.
pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let bytes = std::fs::read(&args.path)?;

    let report = match read_archive_toc(&bytes) {
        Ok(members) => {
            log::info!("{} decodes as an archive with {} member(s)", args.path.display(), members.len());
            let summaries = members
                .iter()
                .map(|(name, blob)| summarize(name, blob))
                .collect::<Result<Vec<_>>>()?;
            Report::Archive { members: summaries }
        }
        Err(LinkError::Format(_)) => {
            log::info!("{} decodes as a single container", args.path.display());
            Report::Container(summarize("<container>", &bytes)?)
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::link::{run_link, LinkArgs};

    #[test]
    fn inspects_a_single_container_output() {
        let dir = tempfile::tempdir().unwrap();
        let fixture_path = dir.path().join("fixture.json");
        std::fs::write(
            &fixture_path,
            r#"{"inputs": [{ "name": "a.o", "default": { "types": [
                { "name": "int", "kind": { "Integer": { "bits": 32, "signed": true } } }
            ]}}]}"#,
        )
        .unwrap();
        let output = dir.path().join("out.ctfa");
        run_link(LinkArgs { fixture_path, output: output.clone(), compress_threshold: 4096 }).unwrap();

        run_inspect(InspectArgs { path: output }).unwrap();
    }
}
