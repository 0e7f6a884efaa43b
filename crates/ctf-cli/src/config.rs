//! Configuration for the `ctf-link` CLI.
//!
//! Follows the same shape as the teacher's `faxt::config`: a small,
//! `serde`-derived struct loaded from TOML, with defaults that work with no
//! config file present at all. Unlike `faxt`, this crate has no per-command
//! sub-sections to configure yet, so the struct stays flat.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Default config file name looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "ctf-link.toml";

/// Below this size (in bytes), a serialized archive member is stored raw
/// rather than zlib-compressed. Mirrors real CTF's own practice of only
/// compressing sections large enough for it to pay off.
const DEFAULT_COMPRESS_THRESHOLD: usize = 4096;

/// CLI-wide configuration: the default compression threshold and output
/// path used when a subcommand's own flags don't override them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Archive members larger than this many bytes are zlib-compressed.
    #[serde(default = "default_threshold")]
    pub compress_threshold: usize,

    /// Default output path for `link`, when `--output` is not given.
    #[serde(default)]
    pub default_output: Option<PathBuf>,
}

fn default_threshold() -> usize {
    DEFAULT_COMPRESS_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Self { compress_threshold: default_threshold(), default_output: None }
    }
}

impl Config {
    /// Load configuration from `ctf-link.toml` in the current directory, or
    /// fall back to defaults if it does not exist.
    pub fn load() -> Result<Self> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_a_sane_threshold() {
        let config = Config::default();
        assert_eq!(config.compress_threshold, DEFAULT_COMPRESS_THRESHOLD);
        assert!(config.default_output.is_none());
    }

    #[test]
    fn loads_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctf-link.toml");
        std::fs::write(&path, "compress_threshold = 128\ndefault_output = \"out.ctfa\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.compress_threshold, 128);
        assert_eq!(config.default_output, Some(PathBuf::from("out.ctfa")));
    }

    #[test]
    fn missing_file_is_an_error_when_path_is_explicit() {
        let err = Config::load_from_path(Path::new("/nonexistent/ctf-link.toml")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
