//! Attachment records and the upload/fetch/delete pipeline.
//!
//! An attachment is a metadata record pointing at bytes in the object store.
//! Each attachment is linked to exactly one target entity: a profile, a
//! garage, a vehicle, or a maintenance log.

mod error;
mod service;
mod types;

pub use error::AttachmentError;
pub use service::{AttachmentRepository, AttachmentService};
pub use types::{
    Attachment, AttachmentTarget, CreateAttachmentInput, UploadAttachmentInput, UploadedFile,
};
