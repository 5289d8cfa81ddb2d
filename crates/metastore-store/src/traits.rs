use crate::error::StoreResult;
use crate::types::{Entry, Snapshot};

/// Two-level metadata store: identifier -> (key -> value).
///
/// All implementations must satisfy these invariants:
/// - Every operation is atomic with respect to every other operation. No
///   caller observes a partial effect of another caller's operation.
/// - An identifier present in the store always maps to an entry, possibly
///   empty.
/// - Absence is distinguishable from emptiness: a missing identifier or key
///   is reported as `NotFound`, never as an empty value.
/// - Strict paths (`create_entry`, `set_key_strict`) fail on existing
///   targets; `upsert` and the delete paths never fail on duplicate or
///   missing state.
pub trait MetadataStore: Send + Sync {
    /// `true` iff `id` is present.
    fn exists(&self, id: &str) -> bool;

    /// `true` iff `id` exists and its entry contains `key`.
    fn entry_has_key(&self, id: &str, key: &str) -> bool;

    /// Create an empty entry at `id`.
    ///
    /// Fails with `IdentifierExists` if `id` is already present. The
    /// existing entry is left untouched.
    fn create_entry(&self, id: &str) -> StoreResult<()>;

    /// Insert `key = value` into the entry at `id`, creating the entry if it
    /// is absent.
    ///
    /// Fails with `KeyExists` if `key` is already present; the stored value
    /// is not modified.
    fn set_key_strict(&self, id: &str, key: &str, value: &str) -> StoreResult<()>;

    /// Set `key = value` in the entry at `id`, creating the entry if absent
    /// and overwriting any existing value.
    fn upsert(&self, id: &str, key: &str, value: &str);

    /// Copy of all identifiers at call time.
    fn list_identifiers(&self) -> Vec<String>;

    /// Copy of the keys in the entry at `id`.
    fn list_keys(&self, id: &str) -> StoreResult<Vec<String>>;

    /// The value stored at `id`/`key`.
    fn get_value(&self, id: &str, key: &str) -> StoreResult<String>;

    /// Copy of the whole entry at `id`.
    fn get_entry(&self, id: &str) -> StoreResult<Entry>;

    /// Remove `id` and its entry. Removing an absent identifier is a no-op.
    fn delete_entry(&self, id: &str);

    /// Remove `key` from the entry at `id`. No-op if either is absent.
    fn delete_key(&self, id: &str, key: &str);

    /// Consistent copy of the entire store.
    fn snapshot(&self) -> Snapshot;

    /// Replace the entire contents of the store with `snapshot`.
    fn restore(&self, snapshot: Snapshot);
}
