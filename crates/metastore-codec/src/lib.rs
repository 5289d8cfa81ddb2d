//! Serialization of metadata store snapshots.
//!
//! Every format encodes the same document, `{ "metadata": { id: { key:
//! value } } }`, and every format satisfies the round-trip law: decoding an
//! encoded snapshot yields a snapshot equal to the original. Converting
//! between formats always decodes into the in-memory model first.
//!
//! - [`Format::Json`] -- primary, human-readable
//! - [`Format::Toml`] -- alternate human-readable, one table per identifier
//! - [`Format::Binary`] -- framed bincode

pub mod codec;
pub mod document;
pub mod error;
pub mod format;

pub use codec::{MetadataCodec, BINARY_MAGIC, BINARY_VERSION};
pub use document::DOCUMENT_FIELD;
pub use error::{CodecError, CodecResult};
pub use format::Format;
