//! Thread-safe in-memory metadata storage.
//!
//! The store is a two-level mapping: a unique identifier names an [`Entry`],
//! and each entry maps string keys to string values. It holds no arbitrary
//! objects, only strings, which keeps it trivially serializable.
//!
//! # Storage Backends
//!
//! All backends implement the [`MetadataStore`] trait:
//!
//! - [`InMemoryMetadataStore`] -- `BTreeMap` behind a single `RwLock`
//!
//! # Design Rules
//!
//! 1. One lock guards the whole structure; every operation is atomic.
//! 2. Entries are owned by value. Nothing outside the store aliases them.
//! 3. `create_entry` and `set_key_strict` fail on existing targets;
//!    `upsert` and the delete paths never fail on duplicate or missing state.
//! 4. `upsert` and `set_key_strict` create a missing identifier silently,
//!    `create_entry` does not tolerate an existing one.
//! 5. Listing and snapshot calls return copies, never live views.

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryMetadataStore;
pub use traits::MetadataStore;
pub use types::{Entry, SharedStore, Snapshot};
