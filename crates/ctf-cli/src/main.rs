//! `ctf-link` CLI - a front-end over the `ctf-link` crate's [`Linker`] for
//! building and inspecting links from JSON fixtures, since this workspace
//! has no object-file or real CTF-binary reader of its own (see
//! `ctf-link`'s crate docs for why).

mod commands;
mod config;
mod error;
mod fixture;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{
    inspect::{run_inspect, InspectArgs},
    link::{run_link, LinkArgs},
};
use config::Config;

/// `ctf-link` - merge CTF type/variable containers from a JSON fixture.
#[derive(Parser, Debug)]
#[command(name = "ctf-link")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Merge CTF debug-type containers described by a JSON fixture", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true, env = "CTF_LINK_VERBOSE")]
    verbose: bool,

    /// Path to a `ctf-link.toml` config file (default: `./ctf-link.toml`).
    #[arg(short, long, global = true, env = "CTF_LINK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Link the inputs named in a JSON fixture and write the result.
    Link(LinkCommand),

    /// Print a JSON summary of a container or archive written by `link`.
    Inspect(InspectCommand),
}

/// Arguments for the `link` subcommand.
#[derive(Parser, Debug)]
struct LinkCommand {
    /// Path to the JSON fixture describing inputs to link.
    fixture: PathBuf,

    /// Where to write the resulting container or archive.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Archive members larger than this many bytes are zlib-compressed.
    #[arg(short, long)]
    threshold: Option<usize>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Parser, Debug)]
struct InspectCommand {
    /// Path to a blob written by `link`.
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Link(args) => {
            let output = args
                .output
                .or_else(|| config.default_output.clone())
                .ok_or_else(|| anyhow::anyhow!("no --output given and no default_output in config"))?;
            run_link(LinkArgs {
                fixture_path: args.fixture,
                output,
                compress_threshold: args.threshold.unwrap_or(config.compress_threshold),
            })?;
        }
        Commands::Inspect(args) => {
            run_inspect(InspectArgs { path: args.path })?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_link_subcommand() {
        let cli = Cli::parse_from(["ctf-link", "link", "fixture.json", "--output", "out.ctfa"]);
        assert!(matches!(cli.command, Commands::Link(_)));
    }

    #[test]
    fn parses_inspect_subcommand() {
        let cli = Cli::parse_from(["ctf-link", "inspect", "out.ctfa"]);
        assert!(matches!(cli.command, Commands::Inspect(_)));
    }

    #[test]
    fn parses_global_verbose_before_subcommand() {
        let cli = Cli::parse_from(["ctf-link", "--verbose", "inspect", "out.ctfa"]);
        assert!(cli.verbose);
    }

    #[test]
    fn link_threshold_flag_parses_to_a_number() {
        let cli = Cli::parse_from(["ctf-link", "link", "fixture.json", "--threshold", "128"]);
        if let Commands::Link(args) = cli.command {
            assert_eq!(args.threshold, Some(128));
        } else {
            panic!("expected Link command");
        }
    }
}
