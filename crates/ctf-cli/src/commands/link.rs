//! `ctf-link link` - build the inputs named in a fixture, run the link
//! engine over them, and write the result.

use std::path::PathBuf;

use ctf_link::{Linker, ShareMode};

use crate::error::Result;
use crate::fixture;

/// Arguments for the `link` subcommand.
#[derive(Debug, Clone)]
pub struct LinkArgs {
    /// Path to the JSON fixture describing inputs to link.
    pub fixture_path: PathBuf,
    /// Where to write the resulting container or archive.
    pub output: PathBuf,
    /// Archive members larger than this many bytes are compressed.
    pub compress_threshold: usize,
}

/// Run the `link` subcommand: parse the fixture, register every input,
/// link, intern the fixture's string table, and write the output.
pub fn run_link(args: LinkArgs) -> Result<()> {
    log::info!("reading fixture from {}", args.fixture_path.display());
    let text = std::fs::read_to_string(&args.fixture_path)?;
    let parsed = fixture::parse(&text)?;

    let mut linker = Linker::new();
    fixture::load_into(&mut linker, &parsed)?;
    log::debug!("registered {} input archive(s)", linker.input_count());

    linker.link(ShareMode::Unconflicted)?;
    log::info!("link produced {} per-CU output(s)", linker.cu_output_count());

    if !parsed.strtab.is_empty() {
        let produce = fixture::strtab_producer(parsed.strtab.clone());
        linker.add_strtab(produce)?;
    }

    let bytes = linker.write(args.compress_threshold)?;
    std::fs::write(&args.output, &bytes)?;
    log::info!("wrote {} bytes to {}", bytes.len(), args.output.display());

    Ok(())
}
