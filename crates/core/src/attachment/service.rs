//! Attachment service implementation.

use std::future::Future;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::error::AttachmentError;
use super::types::{Attachment, AttachmentTarget, CreateAttachmentInput, UploadAttachmentInput};
use crate::storage::{ObjectRemoval, ObjectStore};

/// Repository trait for attachment persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AttachmentRepository: Send + Sync {
    /// Create a new attachment record.
    fn create(
        &self,
        input: CreateAttachmentInput,
    ) -> impl Future<Output = Result<Attachment, AttachmentError>> + Send;

    /// Find attachment by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Attachment>, AttachmentError>> + Send;

    /// Link an attachment to a target entity.
    ///
    /// Fails with [`AttachmentError::TargetNotFound`] when the entity does not exist.
    fn attach(
        &self,
        attachment_id: Uuid,
        target: AttachmentTarget,
        target_id: Uuid,
    ) -> impl Future<Output = Result<(), AttachmentError>> + Send;
}

/// Attachment service for managing file attachments.
///
/// Every operation is a straight pipeline: each step runs after the previous
/// one succeeded and the first failure is returned unchanged. Nothing is
/// retried and nothing already written is rolled back.
pub struct AttachmentService<R: AttachmentRepository, S: ObjectStore> {
    storage: Option<Arc<S>>,
    repo: Arc<R>,
}

impl<R: AttachmentRepository, S: ObjectStore> AttachmentService<R, S> {
    /// Create a new attachment service.
    ///
    /// Fetching works without an object store; uploads and deletes fail with
    /// [`AttachmentError::StorageNotConfigured`].
    #[must_use]
    pub fn new(storage: Option<Arc<S>>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    fn storage(&self) -> Result<&S, AttachmentError> {
        self.storage
            .as_deref()
            .ok_or(AttachmentError::StorageNotConfigured)
    }

    /// Upload a file, record it, and link it to its target.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No object store is configured
    /// - The file is larger than the store accepts
    /// - The upload, the insert, or the link fails
    /// - The target entity does not exist (the record is kept)
    pub async fn upload(&self, input: UploadAttachmentInput) -> Result<Attachment, AttachmentError> {
        let storage = self.storage()?;
        storage.validate_upload(input.file.size())?;

        let key = input.file.storage_key();
        let url = storage.upload(&key, input.file.bytes).await?;
        info!(key = %key, url = %url, "Stored attachment object");

        let attachment = self
            .repo
            .create(CreateAttachmentInput {
                original_name: input.file.original_name,
                encoding: input.file.encoding,
                mime_type: input.file.mime_type,
                url,
                aws_key: key,
                profile_id: input.profile_id,
            })
            .await?;
        info!(attachment_id = %attachment.id, "Attachment record created");

        self.repo
            .attach(attachment.id, input.target, input.target_id)
            .await?;

        Ok(attachment)
    }

    /// Get attachment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if attachment not found or database operation fails.
    pub async fn get_by_id(&self, attachment_id: Uuid) -> Result<Attachment, AttachmentError> {
        self.repo
            .find_by_id(attachment_id)
            .await?
            .ok_or_else(|| AttachmentError::not_found(attachment_id))
    }

    /// Remove an attachment's object from the store.
    ///
    /// The record and its link stay in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Attachment not found (the store is not touched)
    /// - No object store is configured
    /// - Storage deletion fails
    pub async fn delete(&self, attachment_id: Uuid) -> Result<ObjectRemoval, AttachmentError> {
        let attachment = self.get_by_id(attachment_id).await?;
        let removal = self.storage()?.remove(&attachment.aws_key).await?;
        Ok(removal)
    }
}
