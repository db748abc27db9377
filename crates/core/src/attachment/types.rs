//! Attachment types and data structures.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of entity an attachment can be linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachmentTarget {
    /// A user profile.
    Profile,
    /// A garage owned by a profile.
    Garage,
    /// A vehicle kept in a garage.
    Vehicle,
    /// A maintenance log entry for a vehicle.
    MaintenanceLog,
}

impl AttachmentTarget {
    /// Wire name, as used in the `/api/attachments/{model}` path segment.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Garage => "garage",
            Self::Vehicle => "vehicle",
            Self::MaintenanceLog => "maintenance-log",
        }
    }

    /// Parse from the wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "profile" => Some(Self::Profile),
            "garage" => Some(Self::Garage),
            "vehicle" => Some(Self::Vehicle),
            "maintenance-log" => Some(Self::MaintenanceLog),
            _ => None,
        }
    }
}

impl fmt::Display for AttachmentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file received in an upload request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Server-generated name for this upload.
    pub temp_name: String,
    /// File name supplied by the client.
    pub original_name: String,
    /// Transfer encoding of the uploaded part.
    pub encoding: String,
    /// MIME type of the uploaded part.
    pub mime_type: String,
    /// File contents.
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Object-store key: `{temp_name}.{original_name}`.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{}.{}", self.temp_name, self.original_name)
    }

    /// File size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Input for uploading a new attachment and linking it to a target.
#[derive(Debug, Clone)]
pub struct UploadAttachmentInput {
    /// Kind of entity to link to.
    pub target: AttachmentTarget,
    /// ID of the entity to link to.
    pub target_id: Uuid,
    /// Profile of the uploading principal.
    pub profile_id: Uuid,
    /// The uploaded file.
    pub file: UploadedFile,
}

/// Input for creating an attachment record.
#[derive(Debug, Clone)]
pub struct CreateAttachmentInput {
    /// Original filename.
    pub original_name: String,
    /// Transfer encoding.
    pub encoding: String,
    /// MIME type.
    pub mime_type: String,
    /// Retrieval URL returned by the object store.
    pub url: String,
    /// Object-store key.
    pub aws_key: String,
    /// Profile that uploaded the file.
    pub profile_id: Uuid,
}

/// Attachment domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Unique identifier.
    pub id: Uuid,
    /// Original filename.
    pub original_name: String,
    /// Transfer encoding.
    pub encoding: String,
    /// MIME type.
    pub mime_type: String,
    /// Retrieval URL.
    pub url: String,
    /// Object-store key.
    pub aws_key: String,
    /// Profile that uploaded the file.
    pub profile_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
