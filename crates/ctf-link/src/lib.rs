//! ctf-link - a linker core for merging many CTF type/variable containers
//! into one shared output.
//!
//! A [`Linker`] owns a single arena of [`Container`]s for its whole
//! lifetime: every input, the shared output, and every per-CU child the
//! link creates lives there, addressed by [`ContainerId`]. Ids are never
//! reused, so they stay valid for the session even after a container is
//! logically done with.
//!
//! ## Pipeline
//!
//! 1. [`Linker::add_ctf`] registers one [`Archive`] of input containers
//!    under a name (typically the path it came from). This crate has no
//!    CTF-binary or object-file reader; inputs are built directly via
//!    [`Container::define_type`]/[`Container::define_variable`] or supplied
//!    by a caller that already parsed them elsewhere.
//! 2. [`Linker::link`] folds every registered input's types and variables
//!    into the shared output, splitting a per-CU child wherever two inputs
//!    disagree about the same name.
//! 3. [`Linker::add_strtab`] attributes external string-table offsets to
//!    whichever output containers reference them.
//! 4. [`Linker::write`] serializes the result: the shared output alone if
//!    no per-CU split was needed, otherwise an archive of the shared output
//!    and every per-CU child.
//!
//! Once [`Linker::link`] has run, [`Linker::add_ctf`] refuses further input
//! (`LinkError::AddedLate`): a later input could otherwise land ahead of
//! work already folded into the shared output.
//!
//! ## Concurrency
//!
//! The engine is single-threaded and synchronous by design: there is one
//! arena, mutated in place, and the fold order within an input matters (see
//! [`engine`]'s module docs). Nothing here reaches for `Send`/`Sync`
//! bounds, channels, or a thread pool; callers that want to link several
//! independent archives in parallel should run separate [`Linker`]s on
//! separate threads and merge their outputs as a further input, rather than
//! expect internal parallelism.

pub mod archive;
pub mod container;
pub mod cu_registry;
pub mod engine;
pub mod error;
pub mod ids;
pub mod input_registry;
pub mod linker;
pub mod strtab;
pub mod type_id;
pub mod type_map;
pub mod types;
pub mod writer;

pub use archive::Archive;
pub use container::{Container, ContainerSnapshot};
pub use engine::ShareMode;
pub use error::{LinkError, Result};
pub use ids::{ContainerId, CTF_DEFAULT_MEMBER};
pub use linker::Linker;
pub use type_id::TypeId;
pub use types::{TypeDef, TypeKind};
pub use writer::{read_archive_toc, read_container};
