use medrec::store::backend::StorageBackend;
use medrec::store::fs_backend::FsBackend;
use std::fs;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_key_io() {
    let (_dir, backend) = setup();

    backend.set("medicalRecords", "[]").unwrap();
    assert_eq!(backend.get("medicalRecords").unwrap(), Some("[]".to_string()));

    backend.remove("medicalRecords").unwrap();
    assert_eq!(backend.get("medicalRecords").unwrap(), None);
}

#[test]
fn test_fs_backend_missing_key_is_none() {
    let (_dir, backend) = setup();
    assert_eq!(backend.get("nothing-here").unwrap(), None);
    // Removing a key that was never written is not an error.
    backend.remove("nothing-here").unwrap();
}

#[test]
fn test_fs_backend_creates_root_lazily() {
    let (dir, backend) = setup();
    assert!(!dir.path().join("data").exists());
    backend.set("k", "v").unwrap();
    assert!(dir.path().join("data").is_dir());
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (_dir, backend) = setup();

    backend.set("medicalRecords", "first").unwrap();
    backend.set("medicalRecords", "second").unwrap();

    let expected_path = backend.key_path("medicalRecords");
    assert_eq!(expected_path, backend.root().join("medicalRecords.json"));
    assert_eq!(fs::read_to_string(&expected_path).unwrap(), "second");

    for entry in fs::read_dir(backend.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_lock_is_exclusive() {
    let (_dir, backend) = setup();

    assert!(backend.try_lock("import").unwrap());
    assert!(!backend.try_lock("import").unwrap());
    assert!(backend.root().join("import.lock").exists());

    backend.unlock("import").unwrap();
    assert!(!backend.root().join("import.lock").exists());
    assert!(backend.try_lock("import").unwrap());
}

#[test]
fn test_fs_backend_lock_seen_by_second_handle() {
    let (dir, first) = setup();
    let second = FsBackend::new(dir.path().join("data"));

    assert!(first.try_lock("import").unwrap());
    assert!(!second.try_lock("import").unwrap());
    first.unlock("import").unwrap();
    assert!(second.try_lock("import").unwrap());
}

#[test]
fn test_fs_backend_unlock_without_lock_is_ok() {
    let (_dir, backend) = setup();
    backend.unlock("import").unwrap();
}

#[test]
fn test_fs_backend_takes_over_stale_lock() {
    let (_dir, backend) = setup();
    fs::create_dir_all(backend.root()).unwrap();
    let lock = backend.root().join("import.lock");
    fs::write(&lock, "999999\n").unwrap();
    let file = fs::File::options().write(true).open(&lock).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(3600))
        .unwrap();
    drop(file);

    assert!(backend.try_lock("import").unwrap());
    let holder = fs::read_to_string(&lock).unwrap();
    assert_eq!(holder.trim(), std::process::id().to_string());
    assert!(!backend.try_lock("import").unwrap());
}

#[test]
fn test_fs_backend_respects_fresh_lock_from_other_process() {
    let (_dir, backend) = setup();
    fs::create_dir_all(backend.root()).unwrap();
    fs::write(backend.root().join("import.lock"), "999999\n").unwrap();

    assert!(!backend.try_lock("import").unwrap());

    let impatient = FsBackend::new(backend.root()).with_stale_after(Duration::ZERO);
    assert!(impatient.try_lock("import").unwrap());
}
