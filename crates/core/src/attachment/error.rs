//! Attachment error types.

use thiserror::Error;
use uuid::Uuid;

use super::types::AttachmentTarget;
use crate::storage::StorageError;

/// Attachment operation errors.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// Attachment not found.
    #[error("attachment not found: {0}")]
    NotFound(Uuid),

    /// The entity the attachment should be linked to does not exist.
    #[error("{target} not found: {id}")]
    TargetNotFound {
        /// Kind of the missing entity.
        target: AttachmentTarget,
        /// ID of the missing entity.
        id: Uuid,
    },

    /// No object store is configured.
    #[error("object storage is not configured")]
    StorageNotConfigured,

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl AttachmentError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound(id)
    }

    /// Create a target not found error.
    #[must_use]
    pub fn target_not_found(target: AttachmentTarget, id: Uuid) -> Self {
        Self::TargetNotFound { target, id }
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
