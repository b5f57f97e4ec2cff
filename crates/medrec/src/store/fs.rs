use super::fs_backend::FsBackend;
use super::record_store::RecordStore;
use crate::auth::Session;
use std::path::PathBuf;
use std::rc::Rc;

pub type FileStore = RecordStore<Rc<FsBackend>>;
pub type FileSession = Session<Rc<FsBackend>>;

impl FileStore {
    /// Opens (or lazily creates) the store rooted at `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        RecordStore::load(Rc::new(FsBackend::new(data_dir)))
    }
}

/// Store and login session over one shared data directory.
pub fn open_with_session(data_dir: impl Into<PathBuf>) -> (FileStore, FileSession) {
    let backend = Rc::new(FsBackend::new(data_dir));
    (RecordStore::load(backend.clone()), Session::load(backend))
}
