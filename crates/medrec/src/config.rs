//! # Configuration
//!
//! Medrec configuration is loaded with [`confique`] from layered sources.
//!
//! ## Resolution Order
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `MEDREC_PAGE_SIZE`, `MEDREC_EXPORT_DIR`.
//!    `MEDREC_DATA_DIR` picks where `medrec.toml` itself is read from, see
//!    [`default_data_dir`].
//! 2. **Config file**: `medrec.toml` in the data directory.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `page_size` | `10` | Rows per page in `medrec list` |
//! | `data_dir` | OS data dir | Where records and the session are stored |
//! | `export_dir` | current dir | Where `medrec export` writes files |
//!
//! ## CLI Usage
//!
//! - `medrec config` shows the resolved values.
//! - `medrec config template` prints a commented sample `medrec.toml`.

use crate::error::{MedrecError, Result};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "medrec.toml";
pub const DATA_DIR_ENV: &str = "MEDREC_DATA_DIR";

/// Configuration for medrec, stored in `medrec.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MedrecConfig {
    /// Number of records shown per page when listing.
    #[config(default = 10, env = "MEDREC_PAGE_SIZE")]
    pub page_size: usize,

    /// Directory holding medicalRecords.json and the saved session. Set in
    /// `medrec.toml` to keep records somewhere other than where the config
    /// file lives.
    pub data_dir: Option<PathBuf>,

    /// Directory export files are written to. Defaults to the working
    /// directory.
    #[config(env = "MEDREC_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,
}

impl Default for MedrecConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            data_dir: None,
            export_dir: None,
        }
    }
}

impl MedrecConfig {
    /// Loads env overrides on top of `<dir>/medrec.toml`. A missing file is
    /// fine; a malformed one is an error.
    pub fn load_from(dir: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(dir.join(CONFIG_FILE))
            .load()
            .map_err(|e| MedrecError::Config(e.to_string()))
    }

    /// Rows per page, never zero.
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// A sample `medrec.toml` with every key documented.
    pub fn template() -> String {
        confique::toml::template::<MedrecConfig>(confique::toml::FormatOptions::default())
    }
}

/// Picks the data directory: an explicit path wins, then `MEDREC_DATA_DIR`,
/// then the OS data directory.
pub fn default_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("org", "medrec", "medrec")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MedrecError::Config("could not determine a data directory".to_string()))
}
