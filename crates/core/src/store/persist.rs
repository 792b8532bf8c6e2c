//! Load-on-open, save-on-mutation wrapper for store state.
//!
//! Each store is one durable key holding `{ "version": N, "state": ... }`.
//! A blob with a different version, or one that no longer parses, is
//! discarded and the store starts from its default. There is no migration.
//!
//! A blob that parses but breaks a store's invariants is repaired on open
//! (see [`Persisted::open_with`]) and the repaired state is written back.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix shared by every store's storage key.
pub const KEY_PREFIX: &str = "teahouse-";

/// Errors raised by a [`Storage`] backend or by (de)serialization.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem or OS-level failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend cannot represent this key.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// Writing would exceed the backend's size limit.
    #[error("storage quota exceeded writing {key} ({size} bytes, limit {limit})")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },
}

/// Durable string key-value storage.
pub trait Storage: Send + Sync {
    /// Read a value, `None` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, used by tests and by sessions that opt out of disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that rejects values larger than `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(bytes),
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota
            && value.len() > limit
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
                limit,
            });
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Name and schema version of a persisted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreKey {
    pub name: &'static str,
    pub version: u32,
}

impl StoreKey {
    /// Create a store key.
    #[must_use]
    pub const fn new(name: &'static str, version: u32) -> Self {
        Self { name, version }
    }

    /// The storage key this store is written under, e.g. `teahouse-cart`.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{KEY_PREFIX}{}", self.name)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, S> {
    version: u32,
    state: &'a S,
}

#[derive(Deserialize)]
struct Envelope<S> {
    version: u32,
    state: S,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

type Subscriber<S> = Box<dyn Fn(&S) + Send + Sync>;

/// A state container that persists itself after every mutation.
///
/// The in-memory state is authoritative: if saving fails the failure is
/// logged and the mutation still stands for the rest of the session.
pub struct Persisted<S> {
    key: StoreKey,
    state: S,
    storage: Arc<dyn Storage>,
    subscribers: Vec<Subscriber<S>>,
}

impl<S> fmt::Debug for Persisted<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persisted")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<S> Persisted<S>
where
    S: Serialize + DeserializeOwned + Default,
{
    /// Open a store, loading any compatible saved state.
    pub fn open(storage: Arc<dyn Storage>, key: StoreKey) -> Self {
        Self::open_with(storage, key, |_| false)
    }

    /// Open a store and pass loaded state through `repair`.
    ///
    /// `repair` restores the store's invariants and returns whether it changed
    /// anything. A repaired state is saved back immediately.
    pub fn open_with(
        storage: Arc<dyn Storage>,
        key: StoreKey,
        repair: impl FnOnce(&mut S) -> bool,
    ) -> Self {
        let mut repaired = false;
        let state = load(storage.as_ref(), key)
            .map(|mut state| {
                repaired = repair(&mut state);
                state
            })
            .unwrap_or_default();

        let store = Self {
            key,
            state,
            storage,
            subscribers: Vec::new(),
        };
        if repaired {
            tracing::warn!(store = key.name, "Repaired saved store that broke its invariants");
            if let Err(e) = store.save() {
                tracing::warn!(store = key.name, error = %e, "Failed to persist repaired store");
            }
        }
        store
    }

    /// The store's key.
    #[must_use]
    pub const fn key(&self) -> StoreKey {
        self.key
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Apply a mutation, then save and notify subscribers.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(&mut self.state);
        if let Err(e) = self.save() {
            tracing::warn!(store = self.key.name, error = %e, "Failed to persist store; keeping in-memory state");
        }
        for subscriber in &self.subscribers {
            subscriber(&self.state);
        }
        result
    }

    /// Register a callback invoked with the new state after each mutation.
    pub fn subscribe(&mut self, subscriber: impl Fn(&S) + Send + Sync + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Serialize the versioned envelope.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if the state cannot be encoded.
    pub fn to_json(&self) -> Result<String, StorageError> {
        let envelope = EnvelopeRef {
            version: self.key.version,
            state: &self.state,
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Write the current state to storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding or the backend write fails.
    pub fn save(&self) -> Result<(), StorageError> {
        let json = self.to_json()?;
        self.storage.set(&self.key.storage_key(), &json)
    }
}

/// Decode a saved envelope, returning `None` for version mismatches.
///
/// # Errors
///
/// Returns [`StorageError::Serialization`] if the blob is not a valid envelope.
pub fn decode<S: DeserializeOwned>(json: &str, key: StoreKey) -> Result<Option<S>, StorageError> {
    let probe: VersionProbe = serde_json::from_str(json)?;
    if probe.version != key.version {
        return Ok(None);
    }
    let envelope: Envelope<S> = serde_json::from_str(json)?;
    Ok(Some(envelope.state))
}

fn load<S: DeserializeOwned>(storage: &dyn Storage, key: StoreKey) -> Option<S> {
    let storage_key = key.storage_key();
    let raw = match storage.get(&storage_key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(store = key.name, error = %e, "Failed to read saved store; starting empty");
            return None;
        }
    };

    match decode(&raw, key) {
        Ok(Some(state)) => Some(state),
        Ok(None) => {
            tracing::info!(store = key.name, version = key.version, "Discarding saved store with a different schema version");
            None
        }
        Err(e) => {
            tracing::warn!(store = key.name, error = %e, "Discarding unreadable saved store");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    const KEY: StoreKey = StoreKey::new("counter", 2);

    #[test]
    fn test_storage_key_is_prefixed() {
        assert_eq!(KEY.storage_key(), "teahouse-counter");
    }

    #[test]
    fn test_mutation_is_saved_and_reloaded() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = Persisted::<Counter>::open(storage.clone(), KEY);
        store.mutate(|c| c.value = 7);

        let raw = storage.get("teahouse-counter").unwrap().unwrap();
        assert_eq!(raw, r#"{"version":2,"state":{"value":7}}"#);

        let reopened = Persisted::<Counter>::open(storage, KEY);
        assert_eq!(reopened.state().value, 7);
    }

    #[test]
    fn test_version_mismatch_resets() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage
            .set("teahouse-counter", r#"{"version":1,"state":{"value":9}}"#)
            .unwrap();

        let store = Persisted::<Counter>::open(storage, KEY);
        assert_eq!(store.state(), &Counter::default());
    }

    #[test]
    fn test_garbage_resets() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set("teahouse-counter", "{not json").unwrap();

        let store = Persisted::<Counter>::open(storage, KEY);
        assert_eq!(store.state(), &Counter::default());
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::with_quota(4));
        let mut store = Persisted::<Counter>::open(storage.clone(), KEY);
        store.mutate(|c| c.value = 3);

        assert_eq!(store.state().value, 3);
        assert!(storage.get("teahouse-counter").unwrap().is_none());
        assert!(matches!(
            store.save(),
            Err(StorageError::QuotaExceeded { limit: 4, .. })
        ));
    }

    #[test]
    fn test_subscribers_see_new_state() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = Persisted::<Counter>::open(storage, KEY);

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_callback = Arc::clone(&seen);
        store.subscribe(move |c| {
            seen_in_callback.store(c.value as usize, Ordering::SeqCst);
        });

        store.mutate(|c| c.value = 11);
        assert_eq!(seen.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_repair_runs_on_load_and_writes_back() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage
            .set("teahouse-counter", r#"{"version":2,"state":{"value":500}}"#)
            .unwrap();

        let store = Persisted::<Counter>::open_with(storage.clone(), KEY, |c| {
            let capped = c.value.min(99);
            let changed = capped != c.value;
            c.value = capped;
            changed
        });
        assert_eq!(store.state().value, 99);
        assert_eq!(
            storage.get("teahouse-counter").unwrap().unwrap(),
            r#"{"version":2,"state":{"value":99}}"#
        );
    }

    #[test]
    fn test_repair_skipped_for_fresh_store() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let store = Persisted::<Counter>::open_with(storage.clone(), KEY, |_| {
            panic!("nothing was loaded");
        });
        assert_eq!(store.state(), &Counter::default());
        assert!(storage.get("teahouse-counter").unwrap().is_none());
    }

    #[test]
    fn test_decode_roundtrip() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = Persisted::<Counter>::open(storage, KEY);
        store.mutate(|c| c.value = 5);

        let json = store.to_json().unwrap();
        let decoded: Option<Counter> = decode(&json, KEY).unwrap();
        assert_eq!(decoded.as_ref(), Some(store.state()));
    }
}
