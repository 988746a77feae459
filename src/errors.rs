//! Error types for catalog operations.

use crate::validate::ValidationError;

/// Errors that can occur during data store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataStoreError {
    /// The requested item was not found in the data store.
    NotFound,
    /// A stored value could not be serialized or deserialized.
    SerializationError(String),
    /// An internal storage system error occurred.
    Internal(String),
}

impl std::fmt::Display for DataStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Item not found in data store"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<sqlx::Error> for DataStoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => DataStoreError::NotFound,
            _ => DataStoreError::Internal(e.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DataStoreError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        DataStoreError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for DataStoreError {
    fn from(e: serde_json::Error) -> Self {
        DataStoreError::SerializationError(e.to_string())
    }
}

impl std::error::Error for DataStoreError {}

/// Why a catalog request failed.
///
/// The first four variants are the caller's fault and all reach the wire as the same
/// generic 400; `Internal` is a server fault and reaches the wire as a generic 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The entity-type token is not song, podcast or audiobook.
    UnknownKind(String),
    /// Wrong field set, unparsable id or unparsable body.
    MalformedRequest(String),
    /// A field value is outside its allowed bounds.
    Validation(ValidationError),
    /// The id does not resolve to a stored record.
    NotFound,
    /// Anything the categories above do not anticipate.
    Internal(DataStoreError),
}

impl CatalogError {
    /// True for failures caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CatalogError::Internal(_))
    }

    /// A short stable label for the failure category, used in logs.
    pub fn category(&self) -> &'static str {
        match self {
            CatalogError::UnknownKind(_) => "unknown_kind",
            CatalogError::MalformedRequest(_) => "malformed_request",
            CatalogError::Validation(_) => "validation",
            CatalogError::NotFound => "not_found",
            CatalogError::Internal(_) => "internal",
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind(token) => write!(f, "unknown audio kind {:?}", token),
            Self::MalformedRequest(msg) => write!(f, "malformed request: {}", msg),
            Self::Validation(e) => write!(f, "validation failed: {}", e),
            Self::NotFound => write!(f, "record not found"),
            Self::Internal(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Internal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(e: ValidationError) -> Self {
        CatalogError::Validation(e)
    }
}

impl From<DataStoreError> for CatalogError {
    fn from(e: DataStoreError) -> Self {
        match e {
            DataStoreError::NotFound => CatalogError::NotFound,
            other => CatalogError::Internal(other),
        }
    }
}
