/// Errors from metadata store operations.
///
/// Every variant is a caller-correctable precondition violation. The store
/// performs no I/O, so nothing here is transient or worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Strict creation of an identifier that is already present.
    #[error("identifier '{id}' already exists")]
    IdentifierExists { id: String },

    /// Strict insertion of a key that is already present in the entry.
    #[error("key '{key}' already exists in identifier '{id}'")]
    KeyExists { id: String, key: String },

    /// The requested identifier is absent.
    #[error("identifier '{id}' does not exist")]
    IdentifierNotFound { id: String },

    /// The identifier exists but the requested key is absent.
    #[error("key '{key}' does not exist in identifier '{id}'")]
    KeyNotFound { id: String, key: String },
}

impl StoreError {
    /// `true` for the strict-path "already exists" family.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::IdentifierExists { .. } | Self::KeyExists { .. })
    }

    /// `true` for the lookup "not found" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::IdentifierNotFound { .. } | Self::KeyNotFound { .. }
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
