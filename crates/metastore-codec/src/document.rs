//! On-the-wire document shape shared by every format.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use metastore_store::Snapshot;

/// Name of the single top-level field in every encoded document.
pub const DOCUMENT_FIELD: &str = "metadata";

/// Borrowed view used when encoding, so a snapshot is never cloned twice.
#[derive(Serialize)]
pub(crate) struct DocumentRef<'a> {
    pub metadata: &'a Snapshot,
}

/// Owned document produced by decoding.
///
/// A missing `metadata` field decodes as an empty store; any other
/// top-level field is rejected, as is a repeated identifier or key.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Document {
    #[serde(default, deserialize_with = "unique_snapshot")]
    pub metadata: Snapshot,
}

fn unique_snapshot<'de, D>(deserializer: D) -> Result<Snapshot, D::Error>
where
    D: Deserializer<'de>,
{
    let UniqueMap(entries) = UniqueMap::<UniqueMap<String>>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|(id, UniqueMap(entry))| (id, entry))
        .collect())
}

/// String-keyed map that fails on a repeated key instead of keeping the
/// last value.
struct UniqueMap<V>(BTreeMap<String, V>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for UniqueMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(UniqueMapVisitor(PhantomData))
    }
}

struct UniqueMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueMapVisitor<V> {
    type Value = UniqueMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with unique string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            match map.entry(key) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                btree_map::Entry::Occupied(slot) => {
                    return Err(de::Error::custom(format!("duplicate key '{}'", slot.key())));
                }
            }
        }
        Ok(UniqueMap(map))
    }
}
