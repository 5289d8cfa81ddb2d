//! Value types shared by the store and its consumers.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::memory::InMemoryMetadataStore;

/// Key/value pairs stored under one identifier.
pub type Entry = BTreeMap<String, String>;

/// Point-in-time copy of every identifier and its entry.
///
/// A snapshot is detached from the store that produced it: later mutations
/// of the store are not visible through it and vice versa.
pub type Snapshot = BTreeMap<String, Entry>;

/// Reference-counted handle to a single store shared between call sites
/// (HTTP handlers, embedding code) without copying its contents.
pub type SharedStore = Arc<InMemoryMetadataStore>;
