//! # Filesystem Object Store
//!
//! Flat directory of immutable objects, one file per object, named by its
//! [`ObjectId`]. The four operations agree on one root and one naming
//! scheme:
//!
//! | Operation | Transition          | Failure modes                              |
//! |-----------|---------------------|--------------------------------------------|
//! | `put`     | absent → present    | `Validation`, `StorageWrite`               |
//! | `list`    | read-only           | `StorageList` (missing root is empty)      |
//! | `get`     | read-only           | `Validation`, `NotFound`, `StorageRead`    |
//! | `delete`  | present → absent    | `Validation`, `NotFound`, `StorageDelete`  |
//!
//! Only regular files are members. Subdirectories and symlinks in the root
//! are ignored by `list` and reported as `NotFound` by `get`/`delete`, so a
//! link planted in the root cannot expose content from elsewhere.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::clock::{Clock, SystemClock};
use crate::config::StorageConfig;
use crate::error::StoreError;
use crate::id::ObjectId;
use crate::mime::content_type_for;

/// How many successive milliseconds `put` tries before giving up on a
/// same-name collision.
const MAX_PUT_ATTEMPTS: u64 = 16;

/// An object read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Identifier the object was read under.
    pub id: ObjectId,
    /// Raw bytes exactly as uploaded.
    pub bytes: Vec<u8>,
    /// Content type derived from the identifier's extension.
    pub content_type: &'static str,
}

impl StoredObject {
    /// Size of the object in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the object is zero-length.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Filesystem-backed object store.
///
/// Cheap to share behind an `Arc`; holds no mutable state of its own.
pub struct ObjectStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl ObjectStore {
    /// Create a store over `config.storage_root` using wall-clock time.
    ///
    /// The directory is not touched until the first `put`.
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a store with an explicit time source.
    pub fn with_clock(config: &StorageConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: config.storage_root.clone(),
            clock,
        }
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Store `bytes` under a fresh identifier derived from `original_name`.
    ///
    /// Creates the storage root on demand. Never overwrites: if the minted
    /// identifier is already taken the timestamp is advanced one
    /// millisecond at a time, up to [`MAX_PUT_ATTEMPTS`] tries.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] for an empty or directory-only name,
    /// [`StoreError::StorageWrite`] when the root cannot be created, the
    /// write fails, or every candidate identifier is taken.
    pub async fn put(&self, original_name: &str, bytes: &[u8]) -> Result<ObjectId, StoreError> {
        let now = self.clock.now_ms();
        let mut id = ObjectId::compose(now, original_name)?;

        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StoreError::StorageWrite {
                path: self.root.clone(),
                source,
            })?;

        for attempt in 0..MAX_PUT_ATTEMPTS {
            if attempt > 0 {
                id = ObjectId::compose(now + attempt, original_name)?;
            }
            let path = self.object_path(&id);
            match write_new(&path, bytes).await {
                Ok(()) => {
                    tracing::info!(id = %id, bytes = bytes.len(), "stored object");
                    return Ok(id);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(id = %id, "identifier taken, advancing timestamp");
                }
                Err(source) => return Err(StoreError::StorageWrite { path, source }),
            }
        }

        Err(StoreError::StorageWrite {
            path: self.object_path(&id),
            source: std::io::Error::new(
                ErrorKind::AlreadyExists,
                format!("no free identifier after {MAX_PUT_ATTEMPTS} attempts"),
            ),
        })
    }

    /// Identifiers currently in the store, newest first.
    ///
    /// A missing root is an empty store.
    ///
    /// # Errors
    ///
    /// [`StoreError::StorageList`] when the root exists but cannot be read.
    pub async fn list(&self) -> Result<Vec<ObjectId>, StoreError> {
        let list_err = |source| StoreError::StorageList {
            path: self.root.clone(),
            source,
        };

        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(root = %self.root.display(), "storage root absent, empty listing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(list_err(e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            let file_type = entry.file_type().await.map_err(list_err)?;
            if !file_type.is_file() {
                continue;
            }
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!(name = ?raw, "skipping non-UTF-8 file name");
                    continue;
                }
            };
            match ObjectId::sanitize(&name) {
                Ok(id) if id.as_str() == name => ids.push(id),
                Ok(_) => tracing::warn!(name = %name, "skipping file name containing a separator"),
                Err(e) => tracing::warn!(name = %name, error = %e, "skipping unusable file name"),
            }
        }

        ids.sort_unstable_by(|a, b| b.cmp(a));
        tracing::debug!(count = ids.len(), "listed objects");
        Ok(ids)
    }

    /// Read an object and derive its content type.
    ///
    /// `raw_id` is reduced to its base name before use.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] for an unusable identifier,
    /// [`StoreError::NotFound`] when no regular file has that name,
    /// [`StoreError::StorageRead`] on other I/O failures.
    pub async fn get(&self, raw_id: &str) -> Result<StoredObject, StoreError> {
        let id = ObjectId::sanitize(raw_id)?;
        let path = self.object_path(&id);
        let read_err = |source: std::io::Error, id: &ObjectId, path: &Path| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::NotFound(id.to_string())
            } else {
                StoreError::StorageRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        };

        let meta = fs::symlink_metadata(&path)
            .await
            .map_err(|e| read_err(e, &id, &path))?;
        if !meta.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let bytes = fs::read(&path).await.map_err(|e| read_err(e, &id, &path))?;
        let content_type = content_type_for(id.extension());
        tracing::debug!(id = %id, bytes = bytes.len(), content_type, "read object");

        Ok(StoredObject {
            id,
            bytes,
            content_type,
        })
    }

    /// Remove an object.
    ///
    /// `raw_id` is reduced to its base name before use. Directories are
    /// never removed.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] for an unusable identifier,
    /// [`StoreError::NotFound`] when no regular file has that name,
    /// [`StoreError::StorageDelete`] on other I/O failures.
    pub async fn delete(&self, raw_id: &str) -> Result<(), StoreError> {
        let id = ObjectId::sanitize(raw_id)?;
        let path = self.object_path(&id);
        let delete_err = |source: std::io::Error, id: &ObjectId, path: &Path| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::NotFound(id.to_string())
            } else {
                StoreError::StorageDelete {
                    path: path.to_path_buf(),
                    source,
                }
            }
        };

        let meta = fs::symlink_metadata(&path)
            .await
            .map_err(|e| delete_err(e, &id, &path))?;
        if !meta.is_file() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        fs::remove_file(&path)
            .await
            .map_err(|e| delete_err(e, &id, &path))?;
        tracing::info!(id = %id, "deleted object");
        Ok(())
    }
}

/// Write `bytes` to a file that must not already exist.
async fn write_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use tempfile::TempDir;

    const T0: u64 = 1_700_000_000_000;

    fn create_test_store() -> (ObjectStore, Arc<FixedClock>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let clock = Arc::new(FixedClock::new(T0));
        let config = StorageConfig::new(temp_dir.path().join("uploads"));
        let store = ObjectStore::with_clock(&config, clock.clone());
        (store, clock, temp_dir)
    }

    #[tokio::test]
    async fn put_creates_root_and_names_object() {
        let (store, _clock, _temp) = create_test_store();
        assert!(!store.root().exists());

        let id = store.put("cat.png", b"meow").await.unwrap();
        assert_eq!(id.as_str(), "1700000000000-cat.png");
        assert!(store.root().join("1700000000000-cat.png").is_file());
    }

    #[tokio::test]
    async fn put_accepts_empty_bytes() {
        let (store, _clock, _temp) = create_test_store();
        let id = store.put("empty.gif", b"").await.unwrap();
        let obj = store.get(id.as_str()).await.unwrap();
        assert!(obj.is_empty());
        assert_eq!(obj.content_type, "image/gif");
    }

    #[tokio::test]
    async fn put_rejects_empty_name() {
        let (store, _clock, _temp) = create_test_store();
        let err = store.put("", b"x").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!store.root().exists(), "root must not be created for rejected input");
    }

    #[tokio::test]
    async fn same_millisecond_puts_do_not_overwrite() {
        let (store, _clock, _temp) = create_test_store();
        let first = store.put("dup.png", b"one").await.unwrap();
        let second = store.put("dup.png", b"two").await.unwrap();

        assert_eq!(first.as_str(), "1700000000000-dup.png");
        assert_eq!(second.as_str(), "1700000000001-dup.png");
        assert_eq!(store.get(first.as_str()).await.unwrap().bytes, b"one");
        assert_eq!(store.get(second.as_str()).await.unwrap().bytes, b"two");
    }

    #[tokio::test]
    async fn put_gives_up_after_bounded_attempts() {
        let (store, _clock, _temp) = create_test_store();
        for _ in 0..MAX_PUT_ATTEMPTS {
            store.put("busy.png", b"x").await.unwrap();
        }
        let err = store.put("busy.png", b"x").await.unwrap_err();
        assert!(matches!(err, StoreError::StorageWrite { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn list_missing_root_is_empty() {
        let (store, _clock, _temp) = create_test_store();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_skips_directories() {
        let (store, clock, _temp) = create_test_store();
        let a = store.put("a.png", b"a").await.unwrap();
        clock.advance(10);
        let b = store.put("b.png", b"b").await.unwrap();
        std::fs::create_dir(store.root().join("9999999999999-nested")).unwrap();

        assert_eq!(store.list().await.unwrap(), vec![b, a]);
    }

    #[tokio::test]
    async fn get_reduces_traversal_to_root() {
        let (store, _clock, temp) = create_test_store();
        std::fs::write(temp.path().join("secret.txt"), b"outside").unwrap();
        store.put("x.png", b"x").await.unwrap();

        let err = store.get("../secret.txt").await.unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
    }

    #[tokio::test]
    async fn get_rejects_dot_dot() {
        let (store, _clock, _temp) = create_test_store();
        let err = store.get("..").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn get_directory_is_not_found() {
        let (store, _clock, _temp) = create_test_store();
        std::fs::create_dir_all(store.root().join("folder.png")).unwrap();
        assert!(store.get("folder.png").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_removes_and_reports_absence() {
        let (store, _clock, _temp) = create_test_store();
        let id = store.put("bye.jpg", b"bye").await.unwrap();

        store.delete(id.as_str()).await.unwrap();
        assert!(store.get(id.as_str()).await.unwrap_err().is_not_found());
        assert!(store.delete(id.as_str()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_never_removes_directories() {
        let (store, _clock, _temp) = create_test_store();
        let dir = store.root().join("keep");
        std::fs::create_dir_all(&dir).unwrap();

        assert!(store.delete("keep").await.unwrap_err().is_not_found());
        assert!(dir.is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn list_skips_names_with_backslashes() {
        let (store, _clock, _temp) = create_test_store();
        let kept = store.put("kept.png", b"k").await.unwrap();
        std::fs::write(store.root().join("dir\\dropped.png"), b"d").unwrap();

        assert_eq!(store.list().await.unwrap(), vec![kept]);
        assert!(store.get("dropped.png").await.unwrap_err().is_not_found());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_not_members() {
        let (store, _clock, temp) = create_test_store();
        std::fs::write(temp.path().join("outside.png"), b"outside").unwrap();
        store.put("real.png", b"real").await.unwrap();
        std::os::unix::fs::symlink(temp.path().join("outside.png"), store.root().join("link.png"))
            .unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(store.get("link.png").await.unwrap_err().is_not_found());
    }
}
