use crate::error::Result;
use std::rc::Rc;

/// Abstract interface for durable key-value storage.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while RecordStore handles the "what" (records, uniqueness, provenance).
///
/// Values are whole serialized documents: a `set` replaces the previous value
/// entirely, there is no partial update.
pub trait StorageBackend {
    // --- Key-Value Operations ---

    /// Read the value stored under `key`.
    /// Returns Ok(None) if nothing has been stored yet.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    // --- Advisory Locks ---

    /// Try to take the named lock. Returns Ok(false) if someone else holds it.
    fn try_lock(&self, name: &str) -> Result<bool>;

    /// Release the named lock. Releasing a free lock is not an error.
    fn unlock(&self, name: &str) -> Result<()>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn try_lock(&self, name: &str) -> Result<bool> {
        (**self).try_lock(name)
    }

    fn unlock(&self, name: &str) -> Result<()> {
        (**self).unlock(name)
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn try_lock(&self, name: &str) -> Result<bool> {
        (**self).try_lock(name)
    }

    fn unlock(&self, name: &str) -> Result<()> {
        (**self).unlock(name)
    }
}
