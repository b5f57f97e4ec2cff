use super::backend::StorageBackend;
use crate::error::{MedrecError, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// Age after which a lock file is assumed to belong to a dead process.
pub const STALE_LOCK_AGE: Duration = Duration::from_secs(10 * 60);

/// File-per-key storage: `<root>/<key>.json`, locks as `<root>/<name>.lock`.
///
/// A lock file older than `stale_after` is taken over, so an import killed
/// mid-way blocks later imports only until the lock goes stale.
pub struct FsBackend {
    root: PathBuf,
    stale_after: Duration,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stale_after: STALE_LOCK_AGE,
        }
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn lock_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.lock", name))
    }

    fn create_lock(&self, path: &Path) -> Result<bool> {
        let opened = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path);
        match opened {
            Ok(mut file) => {
                writeln!(file, "{}", std::process::id()).map_err(MedrecError::Io)?;
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(MedrecError::Io(e)),
        }
    }

    fn is_stale(&self, path: &Path) -> bool {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .is_some_and(|age| age >= self.stale_after)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(MedrecError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MedrecError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.key_path(key);

        // Atomic Write
        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_path, value).map_err(MedrecError::Io)?;
        fs::rename(&tmp_path, target).map_err(MedrecError::Io)?;

        log::debug!("wrote {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MedrecError::Io(e)),
        }
    }

    fn try_lock(&self, name: &str) -> Result<bool> {
        self.ensure_dir()?;
        let path = self.lock_path(name);
        if self.create_lock(&path)? {
            return Ok(true);
        }
        if !self.is_stale(&path) {
            return Ok(false);
        }
        let holder = fs::read_to_string(&path).unwrap_or_default();
        log::warn!(
            "taking over stale {} lock (held by pid {})",
            name,
            holder.trim()
        );
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(MedrecError::Io(e)),
        }
        self.create_lock(&path)
    }

    fn unlock(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.lock_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MedrecError::Io(e)),
        }
    }
}
