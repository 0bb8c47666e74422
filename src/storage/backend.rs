//! Key-value backends for the local store
//!
//! Backends deal only in stored text; (de)serialization lives in
//! [`crate::storage::local_store`].

use super::Result;
use crate::error::StorageError;
use crate::map_io_error;
use async_trait::async_trait;
use fs2::FileExt;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::NamedTempFile;
use tokio::sync::{Mutex, RwLock};

const STORE_FILE_NAME: &str = "store.json";

#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>>;
    async fn write(&self, key: &str, value: String) -> Result<()>;
    /// Drop `key`, reporting whether it was present
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Process-local backend. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}

/// Durable backend keeping every key in one JSON object document.
///
/// Each save goes to a uniquely named temp file in the document's directory
/// and is then renamed over the document, so readers only ever see a complete
/// version. Read-modify-write cycles hold an exclusive lock on a sibling
/// `<document>.lock` file, which serializes writers across handles and
/// processes. Concurrent writers to the same key resolve as last-write-wins.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    lock: Mutex<()>,
    corrupt_reported: AtomicBool,
}

impl FileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
            corrupt_reported: AtomicBool::new(false),
        }
    }

    /// Backend at the platform data directory (`<data_dir>/rollcall/store.json`)
    pub fn at_default_location() -> Result<Self> {
        let data_dir = dirs::data_dir().ok_or(StorageError::DataDirNotFound)?;
        Ok(Self::new(data_dir.join("rollcall").join(STORE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, apply `change` and save it if `change` reports a modification
    async fn update<F>(&self, change: F) -> Result<bool>
    where
        F: FnOnce(&mut HashMap<String, String>) -> bool + Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();

        let outcome = run_blocking(&self.path, move || {
            let _lock = DocumentLock::acquire(&path)?;
            let mut entries = load(&path)?;
            if !change(&mut entries) {
                return Ok(false);
            }
            persist(&path, &entries)?;
            Ok(true)
        })
        .await;

        self.report_corruption(outcome)
    }

    // A corrupt document blocks every later write until it is repaired or removed
    fn report_corruption<T>(&self, outcome: Result<T>) -> Result<T> {
        if let Err(StorageError::Corrupt { message, .. }) = &outcome {
            if !self.corrupt_reported.swap(true, Ordering::Relaxed) {
                log::error!(
                    "Local store {} is corrupt and cannot be updated ({}); repair or delete the file",
                    self.path.display(),
                    message
                );
            }
        }
        outcome
    }
}

#[async_trait]
impl KeyValueBackend for FileBackend {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path.clone();
        let key = key.to_string();

        let outcome = run_blocking(&self.path, move || Ok(load(&path)?.remove(&key))).await;
        self.report_corruption(outcome)
    }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.update(move |entries| {
            entries.insert(key, value);
            true
        })
        .await
        .map(|_| ())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let key = key.to_string();
        self.update(move |entries| entries.remove(&key).is_some()).await
    }
}

/// Exclusive advisory lock on `<document>.lock`, released on drop
struct DocumentLock {
    file: File,
}

impl DocumentLock {
    fn acquire(document: &Path) -> Result<Self> {
        if let Some(parent) = document.parent().filter(|p| !p.as_os_str().is_empty()) {
            map_io_error!(fs::create_dir_all(parent), parent)?;
        }

        let lock_path = lock_path_for(document);
        let file = map_io_error!(
            OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path),
            &lock_path
        )?;
        map_io_error!(file.lock_exclusive(), &lock_path)?;

        Ok(Self { file })
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            log::debug!("Failed to release store lock: {}", e);
        }
    }
}

fn lock_path_for(document: &Path) -> PathBuf {
    let mut name = document
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(STORE_FILE_NAME));
    name.push(".lock");
    document.with_file_name(name)
}

async fn run_blocking<T, F>(path: &Path, task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source: io::Error::other(e),
        })?
}

fn load(path: &Path) -> Result<HashMap<String, String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return map_io_error!(Err(e), path),
    };

    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }

    serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
        key: path.to_string_lossy().to_string(),
        message: e.to_string(),
    })
}

fn persist(path: &Path, entries: &HashMap<String, String>) -> Result<()> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent,
        None => Path::new("."),
    };

    let content = serde_json::to_string_pretty(entries).map_err(|e| StorageError::Serialize {
        key: path.to_string_lossy().to_string(),
        message: e.to_string(),
    })?;

    let mut tmp = map_io_error!(NamedTempFile::new_in(dir), dir)?;
    map_io_error!(tmp.write_all(content.as_bytes()), tmp.path())?;
    map_io_error!(tmp.as_file().sync_all(), tmp.path())?;
    tmp.persist(path).map_err(|e| StorageError::FileIo {
        path: path.to_string_lossy().to_string(),
        source: e.error,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_backend_read_write() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.read("k").await.unwrap(), None);

        backend.write("k", "v1".to_string()).await.unwrap();
        backend.write("k", "v2".to_string()).await.unwrap();
        assert_eq!(backend.read("k").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test]
    async fn test_file_backend_survives_reopen() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("store.json");

        let backend = FileBackend::new(path.clone());
        backend.write("session", "{\"id\":\"u1\"}".to_string()).await.unwrap();
        drop(backend);

        let reopened = FileBackend::new(path.clone());
        assert_eq!(
            reopened.read("session").await.unwrap(),
            Some("{\"id\":\"u1\"}".to_string())
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_backend_missing_file_reads_absent() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let backend = FileBackend::new(temp_dir.path().join("store.json"));
        assert_eq!(backend.read("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_backend_corrupt_document() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let backend = FileBackend::new(path);
        assert!(matches!(
            backend.read("k").await,
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_backend_keeps_other_keys() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let backend = FileBackend::new(temp_dir.path().join("store.json"));

        backend.write("a", "1".to_string()).await.unwrap();
        backend.write("b", "2".to_string()).await.unwrap();

        assert_eq!(backend.read("a").await.unwrap(), Some("1".to_string()));
        assert_eq!(backend.read("b").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_file_backend_remove() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("store.json");
        let backend = FileBackend::new(path.clone());

        assert!(!backend.remove("a").await.unwrap());
        assert!(!path.exists());

        backend.write("a", "1".to_string()).await.unwrap();
        backend.write("b", "2".to_string()).await.unwrap();
        assert!(backend.remove("a").await.unwrap());

        let reopened = FileBackend::new(path);
        assert_eq!(reopened.read("a").await.unwrap(), None);
        assert_eq!(reopened.read("b").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_separate_handles_never_drop_writes() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("store.json");
        let big = |c: char| c.to_string().repeat(200 * 1024);

        for round in 0..20 {
            let first = FileBackend::new(path.clone());
            let second = FileBackend::new(path.clone());
            let (a, b) = (format!("a{}", round), format!("b{}", round));
            let (value_a, value_b) = (big('a'), big('b'));

            let (left, right) = tokio::join!(
                first.write(&a, value_a.clone()),
                second.write(&b, value_b.clone())
            );
            left.unwrap();
            right.unwrap();

            let fresh = FileBackend::new(path.clone());
            assert_eq!(fresh.read(&a).await.unwrap(), Some(value_a), "round {}", round);
            assert_eq!(fresh.read(&b).await.unwrap(), Some(value_b), "round {}", round);
        }

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name != "store.json" && name != "store.json.lock")
            .collect();
        assert!(leftovers.is_empty(), "stray temp files: {:?}", leftovers);
    }

    #[tokio::test]
    async fn test_spawned_writers_on_separate_handles() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("store.json");

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let backend = FileBackend::new(path.clone());
                tokio::spawn(async move { backend.write(&format!("k{}", i), i.to_string()).await })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let fresh = FileBackend::new(path);
        for i in 0..8 {
            assert_eq!(fresh.read(&format!("k{}", i)).await.unwrap(), Some(i.to_string()));
        }
    }

    #[tokio::test]
    async fn test_corrupt_document_blocks_writes_and_is_reported() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "{ truncated").unwrap();

        let backend = FileBackend::new(path.clone());
        assert!(!backend.corrupt_reported.load(Ordering::Relaxed));

        let err = backend.write("k", "v".to_string()).await.unwrap_err();
        match err {
            StorageError::Corrupt { key, .. } => assert_eq!(key, path.to_string_lossy()),
            other => panic!("expected Corrupt, got {:?}", other),
        }
        assert!(backend.corrupt_reported.load(Ordering::Relaxed));

        // the document is left untouched for inspection
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ truncated");
    }

    #[test]
    fn test_lock_path_sits_next_to_document() {
        assert_eq!(
            lock_path_for(Path::new("/data/rollcall/store.json")),
            PathBuf::from("/data/rollcall/store.json.lock")
        );
    }
}
