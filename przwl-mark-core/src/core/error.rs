//! Error types for the przwl-mark core library.

use thiserror::Error;

/// All errors that can occur within the przwl-mark core library.
#[derive(Debug, Error)]
pub enum MarkError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A node ID was requested that does not exist in the bookmark tree.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Input was rejected before any call to the bookmark tree was made.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The requested change does not fit the node it targets.
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    /// A host service rejected the call.
    #[error("Host error: {0}")]
    Collaborator(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`MarkError`].
pub type Result<T> = std::result::Result<T, MarkError>;

impl MarkError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::NodeNotFound(_) => "Bookmark no longer exists".to_string(),
            Self::ValidationFailed(msg) => msg.clone(),
            Self::InvalidNode(msg) => msg.clone(),
            Self::Collaborator(msg) => msg.clone(),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }

    /// Whether the error means the referenced node no longer resolves.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NodeNotFound(_) | Self::Database(rusqlite::Error::QueryReturnedNoRows)
        )
    }
}
