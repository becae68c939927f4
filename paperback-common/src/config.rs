//! Configuration loading and resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The command-line and environment tiers are handled by clap in the binary;
//! this module covers the TOML and default tiers. A missing config file is
//! not an error: services start with defaults and a warning.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// TOML configuration file contents
///
/// All fields optional so partially-written files still load.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    pub database_path: Option<PathBuf>,
    /// Path to the source CSV dataset
    pub dataset_path: Option<PathBuf>,
    /// Field delimiter for the dataset file
    pub delimiter: Option<char>,
    /// Maximum number of books admitted per ingestion run
    pub max_books: Option<usize>,
    /// Records per INSERT batch
    pub chunk_size: Option<usize>,
}

/// Load the TOML config, from an explicit path or the platform default location.
///
/// Returns defaults when no file exists. A file that exists but fails to
/// parse is a hard error: silently ignoring a broken config hides operator
/// mistakes.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };

    let Some(path) = path else {
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        if explicit.is_some() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        warn!("No config file at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Convert a configured delimiter character to the byte the CSV reader wants
///
/// The reader splits on a single byte, so a multi-byte character can never
/// match what is in the file; reject it instead of truncating.
pub fn delimiter_byte(c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(Error::Config(format!(
            "Delimiter must be a single ASCII character, got {:?}",
            c
        )))
    }
}

/// Default configuration file path for the platform
///
/// Linux prefers ~/.config/paperback/config.toml, then /etc/paperback/config.toml.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("paperback").join("config.toml"));

    if let Some(path) = &user_config {
        if path.exists() {
            return user_config;
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/paperback/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    user_config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_default_config_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");
        // Explicit missing path is an error
        assert!(load_toml_config(Some(&path)).is_err());
    }

    #[test]
    fn partial_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "max_books = 500").unwrap();

        let config = load_toml_config(Some(&path)).unwrap();
        assert_eq!(config.max_books, Some(500));
        assert!(config.database_path.is_none());
        assert!(config.delimiter.is_none());
    }

    #[test]
    fn delimiter_must_be_ascii() {
        assert_eq!(delimiter_byte(',').unwrap(), b',');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert!(delimiter_byte('§').is_err());
        assert!(delimiter_byte('→').is_err());
    }

    #[test]
    fn broken_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "max_books = \"not a number").unwrap();

        assert!(load_toml_config(Some(&path)).is_err());
    }
}
