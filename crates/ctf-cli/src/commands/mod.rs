//! Subcommand implementations for the `ctf-link` CLI.
//!
//! Each subcommand lives in its own module, following the layout the
//! teacher's `faxt::commands` uses: an `Args` struct the CLI's `clap`
//! parsing feeds, and a `run_*` function the binary's dispatch calls into.

pub mod inspect;
pub mod link;

pub use inspect::{run_inspect, InspectArgs};
pub use link::{run_link, LinkArgs};
