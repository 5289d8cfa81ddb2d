use thiserror::Error;

use crate::format::Format;

#[derive(Debug, Error)]
pub enum CodecError {
    /// Input did not match the expected document shape.
    #[error("malformed {format} document: {reason}")]
    Format { format: Format, reason: String },

    #[error("unknown format: {0}")]
    UnknownFormat(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CodecError {
    pub(crate) fn format(format: Format, reason: impl ToString) -> Self {
        Self::Format {
            format,
            reason: reason.to_string(),
        }
    }

    /// `true` when decoding rejected the input.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
