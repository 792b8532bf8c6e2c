//! File-backed durable storage.
//!
//! Every key is one JSON file under the data directory. Writes go to a
//! temporary sibling first and are renamed into place, so a crash mid-write
//! leaves the previous value intact.
//!
//! Keys map to file names unchanged, so only ASCII letters, digits, `-` and
//! `_` are accepted.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use teahouse_core::store::{Storage, StorageError};

/// Default upper bound on a single stored value.
pub const DEFAULT_QUOTA: usize = 5 * 1024 * 1024;

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota: usize,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Opened file storage");
        Ok(Self {
            dir,
            quota: DEFAULT_QUOTA,
        })
    }

    /// Reject values larger than `bytes`.
    #[must_use]
    pub const fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = bytes;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if value.len() > self.quota {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
                limit: self.quota,
            });
        }

        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let written = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp)
                && cleanup.kind() != ErrorKind::NotFound
            {
                tracing::warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temporary file");
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use teahouse_core::store::CartStore;
    use teahouse_core::store::Notifier;
    use teahouse_core::types::{ProductId, ProductSnapshot};

    use super::*;

    #[test]
    fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get("teahouse-cart").unwrap(), None);
    }

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.set("teahouse-wishlist", "{\"version\":1}").unwrap();
        assert_eq!(
            storage.get("teahouse-wishlist").unwrap().as_deref(),
            Some("{\"version\":1}")
        );
        assert!(dir.path().join("teahouse-wishlist.json").exists());

        storage.remove("teahouse-wishlist").unwrap();
        storage.remove("teahouse-wishlist").unwrap();
        assert_eq!(storage.get("teahouse-wishlist").unwrap(), None);
    }

    #[test]
    fn test_keys_cannot_escape_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(matches!(
            storage.set("../evil", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_distinct_keys_never_share_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.set("a_b", "underscore").unwrap();
        assert!(matches!(
            storage.set("a/b", "slash"),
            Err(StorageError::InvalidKey(_))
        ));
        assert_eq!(storage.get("a_b").unwrap().as_deref(), Some("underscore"));
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        // A non-empty directory where the file should go makes the rename fail.
        let blocker = dir.path().join("teahouse-cart.json");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        assert!(matches!(
            storage.set("teahouse-cart", "{}"),
            Err(StorageError::Io(_))
        ));
        assert!(!dir.path().join("teahouse-cart.json.tmp").exists());
    }

    #[test]
    fn test_quota() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap().with_quota(4);
        assert!(matches!(
            storage.set("k", "too long"),
            Err(StorageError::QuotaExceeded { limit: 4, .. })
        ));
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_cart_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let oolong =
            ProductSnapshot::new(ProductId::new(9), "Tieguanyin", Decimal::new(1500, 0)).unwrap();

        {
            let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(dir.path()).unwrap());
            let mut cart = CartStore::open(storage, Notifier::new());
            cart.add_item(oolong, 3);
        }

        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(dir.path()).unwrap());
        let cart = CartStore::open(storage, Notifier::new());
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Decimal::new(4500, 0));
    }
}
