use std::collections::btree_map;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::MetadataStore;
use crate::types::{Entry, Snapshot};

/// In-memory, `BTreeMap`-based metadata store.
///
/// One `RwLock` guards the whole identifier/key/value structure. Each
/// operation does its check and its mutation under a single acquisition, so
/// a lookup racing a delete sees either the value or `NotFound`, never a
/// half-removed entry.
pub struct InMemoryMetadataStore {
    entries: RwLock<Snapshot>,
}

impl InMemoryMetadataStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Snapshot::new()),
        }
    }

    /// Create a store pre-populated from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            entries: RwLock::new(snapshot),
        }
    }

    /// Number of identifiers currently stored.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if the store holds no identifiers.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Remove every identifier.
    pub fn clear(&self) {
        self.write().clear();
    }

    // No operation panics while holding the write guard, so a poisoned lock
    // still protects a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for InMemoryMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn exists(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    fn entry_has_key(&self, id: &str, key: &str) -> bool {
        self.read()
            .get(id)
            .is_some_and(|entry| entry.contains_key(key))
    }

    fn create_entry(&self, id: &str) -> StoreResult<()> {
        let mut map = self.write();
        match map.entry(id.to_string()) {
            btree_map::Entry::Occupied(_) => Err(StoreError::IdentifierExists { id: id.into() }),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(Entry::new());
                debug!(id, "created entry");
                Ok(())
            }
        }
    }

    fn set_key_strict(&self, id: &str, key: &str, value: &str) -> StoreResult<()> {
        let mut map = self.write();
        let entry = map.entry(id.to_string()).or_default();
        match entry.entry(key.to_string()) {
            btree_map::Entry::Occupied(_) => Err(StoreError::KeyExists {
                id: id.into(),
                key: key.into(),
            }),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                debug!(id, key, "inserted key");
                Ok(())
            }
        }
    }

    fn upsert(&self, id: &str, key: &str, value: &str) {
        let mut map = self.write();
        map.entry(id.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        debug!(id, key, "upserted key");
    }

    fn list_identifiers(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn list_keys(&self, id: &str) -> StoreResult<Vec<String>> {
        let map = self.read();
        let entry = map
            .get(id)
            .ok_or_else(|| StoreError::IdentifierNotFound { id: id.into() })?;
        Ok(entry.keys().cloned().collect())
    }

    fn get_value(&self, id: &str, key: &str) -> StoreResult<String> {
        let map = self.read();
        let entry = map
            .get(id)
            .ok_or_else(|| StoreError::IdentifierNotFound { id: id.into() })?;
        entry.get(key).cloned().ok_or_else(|| StoreError::KeyNotFound {
            id: id.into(),
            key: key.into(),
        })
    }

    fn get_entry(&self, id: &str) -> StoreResult<Entry> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::IdentifierNotFound { id: id.into() })
    }

    fn delete_entry(&self, id: &str) {
        if self.write().remove(id).is_some() {
            debug!(id, "deleted entry");
        }
    }

    fn delete_key(&self, id: &str, key: &str) {
        let mut map = self.write();
        if let Some(entry) = map.get_mut(id) {
            if entry.remove(key).is_some() {
                debug!(id, key, "deleted key");
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        self.read().clone()
    }

    fn restore(&self, snapshot: Snapshot) {
        let count = snapshot.len();
        *self.write() = snapshot;
        debug!(identifiers = count, "restored store contents");
    }
}

impl std::fmt::Debug for InMemoryMetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryMetadataStore")
            .field("identifier_count", &count)
            .finish()
    }
}
