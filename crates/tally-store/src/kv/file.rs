//! # File Store
//!
//! One file per key inside a data directory.
//!
//! ## Write Path
//! ```text
//! set("tally.cart.session", json)
//!   │
//!   ├── 1. create data dir if missing
//!   ├── 2. write  .tally.cart.session.<uuid>.tmp
//!   ├── 3. fsync the temp file
//!   └── 4. rename over tally.cart.session     ← atomic on the same volume
//! ```
//! A crash at any step leaves either the old value or the new one, never a
//! half-written file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// Keys must be non-empty, must not start with `.` (reserved for temp
    /// files) and may only use ASCII letters, digits, `.`, `-` and `_`.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(key, err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(key, e))?;

        let tmp_path = self.dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));
        let written = write_synced(&tmp_path, value).and_then(|()| fs::rename(&tmp_path, &path));

        if let Err(err) = written {
            // Best effort; the temp file may not exist
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io(key, err));
        }

        debug!(path = %path.display(), bytes = value.len(), "File store write");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "File store remove");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::io(key, err)),
        }
    }
}

fn write_synced(path: &Path, value: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_and_overwrite() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path().join("data"));

        assert_eq!(store.get("tally.cart.session").unwrap(), None);

        store.set("tally.cart.session", "{\"a\":1}").unwrap();
        store.set("tally.cart.session", "{\"a\":2}").unwrap();
        assert_eq!(
            store.get("tally.cart.session").unwrap().as_deref(),
            Some("{\"a\":2}")
        );

        // Only the final file remains; no temp files left behind
        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["tally.cart.session".to_string()]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path());

        store.set("cart", "x").unwrap();
        store.remove("cart").unwrap();
        store.remove("cart").unwrap();
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_rejects_unsafe_keys() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path());

        for key in ["", "../escape", "a/b", ".hidden", "with space"] {
            assert!(
                matches!(store.set(key, "x"), Err(StoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        // A directory where the file should be
        fs::create_dir(tmp.path().join("cart")).unwrap();

        assert!(matches!(store.get("cart"), Err(StoreError::Io { .. })));
    }
}
