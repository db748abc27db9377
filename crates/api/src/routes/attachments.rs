//! Attachment routes.
//!
//! - `POST /attachments/{model}?id=` uploads one file and links it to a target
//! - `GET /attachments?id=` fetches an attachment record
//! - `DELETE /attachments?id=` removes an attachment's stored object

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Path, Query, State,
        multipart::MultipartRejection,
        rejection::{PathRejection, QueryRejection},
    },
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{ApiError, AppState, middleware::AuthUser};
use pitstop_core::attachment::{
    Attachment, AttachmentService, AttachmentTarget, UploadAttachmentInput, UploadedFile,
};
use pitstop_core::storage::{ObjectRemoval, StorageService};
use pitstop_db::AttachmentRepository;
use pitstop_shared::AppError;

/// Transfer encoding reported when a part does not declare one.
const DEFAULT_ENCODING: &str = "7bit";

/// Creates the attachment routes.
///
/// `body_limit` caps the request body so oversized uploads are cut off while
/// streaming instead of being buffered whole.
pub fn routes(body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/attachments/{model}", post(upload_attachment))
        .route(
            "/attachments",
            get(get_attachment).delete(delete_attachment),
        )
        .layer(DefaultBodyLimit::max(body_limit))
}

// ============================================================================
// Request Types
// ============================================================================

/// `?id=` query parameter shared by all attachment routes.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    /// Target entity ID (upload) or attachment ID (fetch, delete).
    #[serde(default)]
    pub id: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Unwrap the query string, reporting a malformed one as a validation error.
fn id_query(query: Result<Query<IdQuery>, QueryRejection>) -> Result<IdQuery, AppError> {
    query
        .map(|Query(query)| query)
        .map_err(|e| AppError::Validation(format!("invalid query string: {e}")))
}

/// Parse the required `id` query parameter.
fn required_id(query: &IdQuery, what: &str) -> Result<Uuid, AppError> {
    let raw = query
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation(format!("missing {what} ID query")))?;

    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("invalid {what} ID: {raw}")))
}

/// Last path component of a client-supplied filename.
///
/// Both `/` and `\` separate components. `None` when nothing usable is left,
/// e.g. for `..` or a trailing separator.
fn base_file_name(raw: &str) -> Option<&str> {
    match raw.rsplit(['/', '\\']).next()? {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// Server-generated name for an uploaded file. Time-ordered, so keys sort by upload time.
fn generate_temp_name() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Collect every file part of a multipart body.
///
/// Non-file fields and parts whose filename has no usable last component are
/// skipped. A body that is not multipart has no files.
async fn read_files(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<UploadedFile>, AppError> {
    let Ok(mut multipart) = multipart else {
        return Ok(Vec::new());
    };

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let Some(original_name) = field
            .file_name()
            .and_then(base_file_name)
            .map(String::from)
        else {
            continue;
        };

        let mime_type = field.content_type().map_or_else(
            || {
                mime_guess::from_path(&original_name)
                    .first_or_octet_stream()
                    .to_string()
            },
            String::from,
        );
        let encoding = field
            .headers()
            .get("content-transfer-encoding")
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_ENCODING)
            .to_string();

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read file part: {e}")))?;

        files.push(UploadedFile {
            temp_name: generate_temp_name(),
            original_name,
            encoding,
            mime_type,
            bytes,
        });
    }

    Ok(files)
}

fn attachment_service(state: &AppState) -> AttachmentService<AttachmentRepository, StorageService> {
    let repo = AttachmentRepository::new(Arc::clone(&state.db));
    AttachmentService::new(state.storage.clone(), Arc::new(repo))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/attachments/{model}?id={target_id}`
/// Upload exactly one file and link it to the target entity.
async fn upload_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    model: Result<Path<String>, PathRejection>,
    query: Result<Query<IdQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Attachment>, ApiError> {
    let profile_id = auth.require_profile()?;

    let Path(model) =
        model.map_err(|e| AppError::Validation(format!("invalid model segment: {e}")))?;
    let target = AttachmentTarget::parse(&model)
        .ok_or_else(|| AppError::Validation(format!("invalid model: {model}")))?;

    let target_id = required_id(&id_query(query)?, "model")?;

    let mut files = read_files(multipart).await?;
    if files.len() != 1 {
        return Err(AppError::Validation(format!(
            "expected exactly one file, got {}",
            files.len()
        ))
        .into());
    }
    let Some(file) = files.pop() else {
        return Err(AppError::Internal("uploaded file vanished".to_string()).into());
    };

    info!(
        target_kind = %target,
        target_id = %target_id,
        original_name = %file.original_name,
        mime_type = %file.mime_type,
        size = file.size(),
        "Valid file ready to upload"
    );

    let attachment = attachment_service(&state)
        .upload(UploadAttachmentInput {
            target,
            target_id,
            profile_id,
            file,
        })
        .await?;

    info!(
        attachment_id = %attachment.id,
        target_kind = %target,
        target_id = %target_id,
        "Attachment uploaded and linked"
    );

    Ok(Json(attachment))
}

/// GET `/attachments?id={attachment_id}`
/// Fetch an attachment record.
async fn get_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Attachment>, ApiError> {
    let attachment_id = required_id(&id_query(query)?, "attachment")?;
    debug!(account_id = %auth.account_id(), attachment_id = %attachment_id, "Fetching attachment");

    let attachment = attachment_service(&state).get_by_id(attachment_id).await?;

    info!(attachment_id = %attachment.id, aws_key = %attachment.aws_key, "Found attachment");

    Ok(Json(attachment))
}

/// DELETE `/attachments?id={attachment_id}`
/// Remove the attachment's object from storage and return the removal result.
async fn delete_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<ObjectRemoval>, ApiError> {
    auth.require_profile()?;
    let attachment_id = required_id(&id_query(query)?, "attachment")?;

    let removal = attachment_service(&state).delete(attachment_id).await?;

    info!(
        attachment_id = %attachment_id,
        key = %removal.key,
        bucket = %removal.bucket,
        "Attachment object removed"
    );

    Ok(Json(removal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_id() {
        let id = Uuid::new_v4();
        let query = IdQuery {
            id: Some(id.to_string()),
        };
        assert_eq!(required_id(&query, "attachment").unwrap(), id);

        let missing = IdQuery::default();
        assert_eq!(
            required_id(&missing, "attachment").unwrap_err().status_code(),
            400
        );

        let empty = IdQuery {
            id: Some(String::new()),
        };
        assert!(required_id(&empty, "attachment").is_err());

        let garbage = IdQuery {
            id: Some("V1".to_string()),
        };
        assert_eq!(
            required_id(&garbage, "model").unwrap_err().status_code(),
            400
        );
    }

    #[test]
    fn test_base_file_name_strips_directories() {
        let cases = [
            ("photo.png", Some("photo.png")),
            ("../escaped.txt", Some("escaped.txt")),
            ("/../../escaped.txt", Some("escaped.txt")),
            ("a\\b", Some("b")),
            ("C:\\Users\\me\\photo.png", Some("photo.png")),
            ("dir/sub\\..\\photo.png", Some("photo.png")),
            ("..", None),
            ("../..", None),
            ("uploads/", None),
            ("", None),
        ];

        for (raw, expected) in cases {
            assert_eq!(base_file_name(raw), expected, "filename {raw:?}");
        }
    }

    #[test]
    fn test_generate_temp_name_is_unique_hex() {
        let a = generate_temp_name();
        let b = generate_temp_name();

        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
