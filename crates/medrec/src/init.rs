//! # Wiring a Data Directory
//!
//! [`initialize`] turns "where is my data" into a ready [`MedrecApi`]:
//!
//! 1. Pick the base directory: explicit override, then `MEDREC_DATA_DIR`,
//!    then the OS data directory (via the `directories` crate).
//! 2. Load [`MedrecConfig`] from `<base>/medrec.toml` plus environment.
//! 3. If the config names a different `data_dir`, records live there
//!    instead. The redirect is followed once; a `medrec.toml` in the target
//!    directory is not read.
//! 4. Open the record store and the saved session over one shared
//!    [`FsBackend`](crate::store::fs_backend::FsBackend).
//!
//! Nothing is created on disk until the first write.

use crate::api::MedrecApi;
use crate::config::{default_data_dir, MedrecConfig};
use crate::error::Result;
use crate::store::fs::{open_with_session, FileSession, FileStore};
use std::path::PathBuf;

pub struct MedrecContext {
    pub api: MedrecApi<FileStore, FileSession>,
    pub config: MedrecConfig,
    pub data_dir: PathBuf,
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<MedrecContext> {
    let base = default_data_dir(data_override)?;
    let config = MedrecConfig::load_from(&base)?;
    let data_dir = config.data_dir.clone().unwrap_or_else(|| base.clone());
    if data_dir != base {
        log::debug!(
            "{} redirects data to {}",
            base.join(crate::config::CONFIG_FILE).display(),
            data_dir.display()
        );
    }
    log::debug!("using data directory {}", data_dir.display());

    let (store, session) = open_with_session(&data_dir);
    Ok(MedrecContext {
        api: MedrecApi::new(store, session),
        config,
        data_dir,
    })
}
