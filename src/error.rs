//! Error types for schema resolution and type synthesis

use thiserror::Error;

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors raised during schema resolution and type synthesis.
///
/// Resolution-layer errors propagate uncaught from the point of detection;
/// there is no retry and no partial-type recovery. A single bad reference
/// aborts generation of the document containing it without corrupting
/// schema identities already resolved for other documents in the batch.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Resource missing, unreachable, or unparseable
    #[error("content unavailable: {uri}: {reason}")]
    ContentUnavailable { uri: String, reason: String },

    /// Missing pointer segment, non-numeric array index, malformed fragment
    #[error("reference resolution failed in {document} at '{path}': {reason}")]
    ReferenceResolution {
        document: String,
        path: String,
        reason: String,
    },

    /// Ambiguous inheritance, duplicate enum member, unresolvable name collision
    #[error("schema conflict in {document}: {reason}")]
    SchemaConflict { document: String, reason: String },

    /// Malformed combinator shape or other structurally invalid construct
    #[error("unsupported construct in {document} at '{path}': {reason}")]
    UnsupportedConstruct {
        document: String,
        path: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Shorthand for a `ContentUnavailable` error
    pub fn unavailable(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ContentUnavailable {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a `ReferenceResolution` error
    pub fn resolution(
        document: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ReferenceResolution {
            document: document.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a `SchemaConflict` error
    pub fn conflict(document: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaConflict {
            document: document.into(),
            reason: reason.into(),
        }
    }
}
