use bincode::Options;
use metastore_store::{MetadataStore, Snapshot};

use crate::document::{Document, DocumentRef};
use crate::error::{CodecError, CodecResult};
use crate::format::Format;

/// Leading bytes of every binary document.
pub const BINARY_MAGIC: [u8; 4] = *b"MDS\0";

/// Current binary layout version.
pub const BINARY_VERSION: u8 = 1;

const BINARY_HEADER_LEN: usize = BINARY_MAGIC.len() + 1;

/// Encoder/decoder between store snapshots and their serialized forms.
pub struct MetadataCodec;

impl MetadataCodec {
    /// Encode a snapshot in the given format.
    pub fn encode(snapshot: &Snapshot, format: Format) -> CodecResult<Vec<u8>> {
        let doc = DocumentRef { metadata: snapshot };
        let bytes = match format {
            Format::Json => serde_json::to_vec(&doc)
                .map_err(|e| CodecError::Serialization(e.to_string()))?,
            Format::Toml => toml::to_string(&doc)
                .map_err(|e| CodecError::Serialization(e.to_string()))?
                .into_bytes(),
            Format::Binary => Self::encode_binary(&doc)?,
        };
        tracing::debug!(%format, identifiers = snapshot.len(), bytes = bytes.len(), "encoded snapshot");
        Ok(bytes)
    }

    /// Decode a snapshot from the given format.
    ///
    /// Fails with [`CodecError::Format`] if the input cannot be parsed or
    /// does not have the document shape.
    pub fn decode(data: &[u8], format: Format) -> CodecResult<Snapshot> {
        let doc: Document = match format {
            Format::Json => {
                serde_json::from_slice(data).map_err(|e| CodecError::format(format, e))?
            }
            Format::Toml => {
                let text = std::str::from_utf8(data).map_err(|e| CodecError::format(format, e))?;
                toml::from_str(text).map_err(|e| CodecError::format(format, e))?
            }
            Format::Binary => Self::decode_binary(data)?,
        };
        tracing::debug!(%format, identifiers = doc.metadata.len(), "decoded snapshot");
        Ok(doc.metadata)
    }

    /// Encode a consistent snapshot of `store`.
    pub fn encode_store(store: &dyn MetadataStore, format: Format) -> CodecResult<Vec<u8>> {
        Self::encode(&store.snapshot(), format)
    }

    /// Decode `data` and replace the contents of `store` with it.
    ///
    /// The store is only touched once decoding has fully succeeded.
    pub fn decode_into(store: &dyn MetadataStore, data: &[u8], format: Format) -> CodecResult<()> {
        let snapshot = Self::decode(data, format)?;
        store.restore(snapshot);
        Ok(())
    }

    /// Re-encode a document from one format into another via the in-memory
    /// model.
    pub fn convert(data: &[u8], from: Format, to: Format) -> CodecResult<Vec<u8>> {
        let snapshot = Self::decode(data, from)?;
        Self::encode(&snapshot, to)
    }

    /// Compact JSON text for `store`.
    pub fn to_json(store: &dyn MetadataStore) -> CodecResult<String> {
        let snapshot = store.snapshot();
        serde_json::to_string(&DocumentRef { metadata: &snapshot })
            .map_err(|e| CodecError::Serialization(e.to_string()))
    }

    /// Indented JSON text for `store`.
    pub fn to_json_pretty(store: &dyn MetadataStore) -> CodecResult<String> {
        let snapshot = store.snapshot();
        serde_json::to_string_pretty(&DocumentRef { metadata: &snapshot })
            .map_err(|e| CodecError::Serialization(e.to_string()))
    }

    /// Populate `store` from JSON text, replacing its contents.
    pub fn from_json(store: &dyn MetadataStore, json: &str) -> CodecResult<()> {
        Self::decode_into(store, json.as_bytes(), Format::Json)
    }

    // Fixed-width integers, and the payload must fill the frame exactly.
    fn binary_options() -> impl Options {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .reject_trailing_bytes()
    }

    // Frame: [4 bytes magic][1 byte version][bincode payload]
    fn encode_binary(doc: &DocumentRef<'_>) -> CodecResult<Vec<u8>> {
        let payload = Self::binary_options()
            .serialize(doc)
            .map_err(|e| CodecError::Serialization(e.to_string()))?;
        let mut buf = Vec::with_capacity(BINARY_HEADER_LEN + payload.len());
        buf.extend_from_slice(&BINARY_MAGIC);
        buf.push(BINARY_VERSION);
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    fn decode_binary(data: &[u8]) -> CodecResult<Document> {
        if data.len() < BINARY_HEADER_LEN {
            return Err(CodecError::format(Format::Binary, "too short"));
        }
        if data[..BINARY_MAGIC.len()] != BINARY_MAGIC {
            return Err(CodecError::format(Format::Binary, "bad magic"));
        }
        let version = data[BINARY_MAGIC.len()];
        if version != BINARY_VERSION {
            return Err(CodecError::format(
                Format::Binary,
                format!("unsupported version {version}"),
            ));
        }
        Self::binary_options()
            .deserialize(&data[BINARY_HEADER_LEN..])
            .map_err(|e| CodecError::format(Format::Binary, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metastore_store::{Entry, InMemoryMetadataStore};
    use proptest::prelude::*;

    fn foo_store() -> InMemoryMetadataStore {
        let store = InMemoryMetadataStore::new();
        store.set_key_strict("Foo", "Bar", "Baz").unwrap();
        store.set_key_strict("Foo", "Bait", "Quux").unwrap();
        store
    }

    #[test]
    fn json_store_roundtrip() {
        let original = foo_store();
        let json = MetadataCodec::to_json(&original).unwrap();
        assert!(!json.is_empty());

        let restored = InMemoryMetadataStore::new();
        MetadataCodec::from_json(&restored, &json).unwrap();
        assert_eq!(restored.get_value("Foo", "Bar").unwrap(), "Baz");
        assert_eq!(restored.get_value("Foo", "Bait").unwrap(), "Quux");
    }

    #[test]
    fn json_shape_is_nested_maps() {
        let json = MetadataCodec::to_json(&foo_store()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["Foo"]["Bar"], "Baz");
        assert_eq!(value["metadata"]["Foo"]["Bait"], "Quux");
    }

    #[test]
    fn empty_entry_preserved_in_every_format() {
        let store = InMemoryMetadataStore::new();
        store.create_entry("Empty").unwrap();
        store.upsert("Full", "k", "v");
        for format in Format::ALL {
            let bytes = MetadataCodec::encode_store(&store, format).unwrap();
            let decoded = MetadataCodec::decode(&bytes, format).unwrap();
            assert_eq!(decoded.get("Empty"), Some(&Entry::new()), "{format}");
            assert_eq!(decoded, store.snapshot(), "{format}");
        }
    }

    #[test]
    fn toml_quotes_awkward_keys() {
        let store = InMemoryMetadataStore::new();
        store.upsert("with space", "dotted.key", "line\nbreak");
        let bytes = MetadataCodec::encode_store(&store, Format::Toml).unwrap();
        let decoded = MetadataCodec::decode(&bytes, Format::Toml).unwrap();
        assert_eq!(decoded["with space"]["dotted.key"], "line\nbreak");
    }

    #[test]
    fn convert_goes_through_model() {
        let store = foo_store();
        let json = MetadataCodec::encode_store(&store, Format::Json).unwrap();
        let toml = MetadataCodec::convert(&json, Format::Json, Format::Toml).unwrap();
        let bin = MetadataCodec::convert(&toml, Format::Toml, Format::Binary).unwrap();
        let back = MetadataCodec::convert(&bin, Format::Binary, Format::Json).unwrap();
        assert_eq!(
            MetadataCodec::decode(&back, Format::Json).unwrap(),
            store.snapshot()
        );
    }

    #[test]
    fn decode_into_replaces_contents() {
        let target = InMemoryMetadataStore::new();
        target.upsert("Stale", "k", "v");
        let bytes = MetadataCodec::encode_store(&foo_store(), Format::Json).unwrap();
        MetadataCodec::decode_into(&target, &bytes, Format::Json).unwrap();
        assert!(!target.exists("Stale"));
        assert_eq!(target.list_keys("Foo").unwrap(), vec!["Bait", "Bar"]);
    }

    #[test]
    fn failed_decode_leaves_store_untouched() {
        let target = foo_store();
        let err = MetadataCodec::from_json(&target, "{not json").unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(target.get_value("Foo", "Bar").unwrap(), "Baz");
    }

    // -----------------------------------------------------------------------
    // Malformed input
    // -----------------------------------------------------------------------

    #[test]
    fn json_wrong_shape() {
        for bad in [
            r#"{"metadata": [1, 2]}"#,
            r#"{"metadata": {"Foo": "Bar"}}"#,
            r#"{"metadata": {"Foo": {"Bar": 1}}}"#,
            r#"{"other": {}}"#,
            "42",
            "",
        ] {
            let err = MetadataCodec::decode(bad.as_bytes(), Format::Json).unwrap_err();
            assert!(err.is_format_error(), "accepted {bad:?}");
        }
    }

    #[test]
    fn toml_wrong_shape() {
        let err = MetadataCodec::decode(b"metadata = 3", Format::Toml).unwrap_err();
        assert!(err.is_format_error());
        let err = MetadataCodec::decode(&[0xff, 0xfe], Format::Toml).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn binary_framing_errors() {
        let err = MetadataCodec::decode(b"MDS", Format::Binary).unwrap_err();
        assert!(err.is_format_error());

        let mut bytes = MetadataCodec::encode_store(&foo_store(), Format::Binary).unwrap();
        assert_eq!(&bytes[..4], &BINARY_MAGIC);
        assert_eq!(bytes[4], BINARY_VERSION);

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(MetadataCodec::decode(&bad_magic, Format::Binary)
            .unwrap_err()
            .is_format_error());

        bytes[4] = 99;
        let err = MetadataCodec::decode(&bytes, Format::Binary).unwrap_err();
        assert!(err.to_string().contains("unsupported version 99"));
    }

    #[test]
    fn binary_truncated_payload() {
        let bytes = MetadataCodec::encode_store(&foo_store(), Format::Binary).unwrap();
        let truncated = &bytes[..bytes.len() - 3];
        assert!(MetadataCodec::decode(truncated, Format::Binary)
            .unwrap_err()
            .is_format_error());
    }

    #[test]
    fn binary_rejects_trailing_bytes() {
        let store = InMemoryMetadataStore::new();
        store.upsert("Foo", "Bar", "Baz");
        let mut bytes = MetadataCodec::encode_store(&store, Format::Binary).unwrap();
        bytes.extend_from_slice(b"GARBAGE");
        let err = MetadataCodec::decode(&bytes, Format::Binary).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn json_rejects_duplicate_keys() {
        let dup_key = r#"{"metadata": {"Foo": {"Bar": "1", "Bar": "2"}}}"#;
        let err = MetadataCodec::decode(dup_key.as_bytes(), Format::Json).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("duplicate key 'Bar'"));

        let dup_id = r#"{"metadata": {"Foo": {}, "Foo": {"Bar": "Baz"}}}"#;
        let err = MetadataCodec::decode(dup_id.as_bytes(), Format::Json).unwrap_err();
        assert!(err.to_string().contains("duplicate key 'Foo'"));
    }

    #[test]
    fn pretty_json_decodes() {
        let pretty = MetadataCodec::to_json_pretty(&foo_store()).unwrap();
        assert!(pretty.contains('\n'));
        let restored = InMemoryMetadataStore::new();
        MetadataCodec::from_json(&restored, &pretty).unwrap();
        assert_eq!(restored.snapshot(), foo_store().snapshot());
    }

    fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
        let text = ".{0,12}";
        let entry = prop::collection::btree_map(text, ".{0,16}", 0..5);
        prop::collection::btree_map(text, entry, 0..6)
    }

    proptest! {
        #[test]
        fn roundtrip_law_holds_for_every_format(snapshot in snapshot_strategy()) {
            for format in Format::ALL {
                let bytes = MetadataCodec::encode(&snapshot, format).unwrap();
                let decoded = MetadataCodec::decode(&bytes, format).unwrap();
                prop_assert_eq!(&decoded, &snapshot);
            }
        }
    }
}
