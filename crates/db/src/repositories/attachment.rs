//! Attachment repository for database operations.
//!
//! Implements attachment persistence and target linking using SeaORM.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{
    attachment_links, attachments, garages, maintenance_logs, profiles, vehicles,
};
use pitstop_core::attachment::{
    Attachment, AttachmentError, AttachmentRepository as AttachmentRepoTrait, AttachmentTarget,
    CreateAttachmentInput,
};

/// Attachment repository implementation.
#[derive(Debug)]
pub struct AttachmentRepository {
    db: Arc<DatabaseConnection>,
}

impl AttachmentRepository {
    /// Create a new attachment repository.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check that the entity an attachment is about to be linked to exists.
    ///
    /// One lookup per target kind, each against its own table.
    async fn target_exists(&self, target: AttachmentTarget, id: Uuid) -> Result<bool, DbErr> {
        let found = match target {
            AttachmentTarget::Profile => profiles::Entity::find_by_id(id)
                .one(&*self.db)
                .await?
                .is_some(),
            AttachmentTarget::Garage => garages::Entity::find_by_id(id)
                .one(&*self.db)
                .await?
                .is_some(),
            AttachmentTarget::Vehicle => vehicles::Entity::find_by_id(id)
                .one(&*self.db)
                .await?
                .is_some(),
            AttachmentTarget::MaintenanceLog => maintenance_logs::Entity::find_by_id(id)
                .one(&*self.db)
                .await?
                .is_some(),
        };
        Ok(found)
    }

    /// Find the target an attachment is linked to, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the stored kind is unknown.
    pub async fn find_link(
        &self,
        attachment_id: Uuid,
    ) -> Result<Option<(AttachmentTarget, Uuid)>, AttachmentError> {
        let Some(link) = attachment_links::Entity::find_by_id(attachment_id)
            .one(&*self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?
        else {
            return Ok(None);
        };

        let target = AttachmentTarget::parse(&link.target_kind).ok_or_else(|| {
            AttachmentError::repository(format!("unknown target kind: {}", link.target_kind))
        })?;
        Ok(Some((target, link.target_id)))
    }
}

impl AttachmentRepoTrait for AttachmentRepository {
    /// Insert the record and return exactly what was written.
    async fn create(&self, input: CreateAttachmentInput) -> Result<Attachment, AttachmentError> {
        // Postgres keeps microseconds.
        let attachment = Attachment {
            id: Uuid::new_v4(),
            original_name: input.original_name,
            encoding: input.encoding,
            mime_type: input.mime_type,
            url: input.url,
            aws_key: input.aws_key,
            profile_id: input.profile_id,
            created_at: Utc::now().trunc_subsecs(6),
        };

        let active_model = attachments::ActiveModel {
            id: Set(attachment.id),
            original_name: Set(attachment.original_name.clone()),
            encoding: Set(attachment.encoding.clone()),
            mime_type: Set(attachment.mime_type.clone()),
            url: Set(attachment.url.clone()),
            aws_key: Set(attachment.aws_key.clone()),
            profile_id: Set(attachment.profile_id),
            created_at: Set(attachment.created_at.into()),
        };

        attachments::Entity::insert(active_model)
            .exec_without_returning(&*self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(attachment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Attachment>, AttachmentError> {
        let model = attachments::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn attach(
        &self,
        attachment_id: Uuid,
        target: AttachmentTarget,
        target_id: Uuid,
    ) -> Result<(), AttachmentError> {
        let exists = self
            .target_exists(target, target_id)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        if !exists {
            debug!(target_kind = %target, target_id = %target_id, "Link target not found");
            return Err(AttachmentError::target_not_found(target, target_id));
        }

        let link = attachment_links::ActiveModel {
            attachment_id: Set(attachment_id),
            target_kind: Set(target.as_str().to_string()),
            target_id: Set(target_id),
            created_at: Set(Utc::now().into()),
        };

        attachment_links::Entity::insert(link)
            .exec_without_returning(&*self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(())
    }
}

/// Convert database model to domain model.
fn to_domain(model: attachments::Model) -> Attachment {
    Attachment {
        id: model.id,
        original_name: model.original_name,
        encoding: model.encoding,
        mime_type: model.mime_type,
        url: model.url,
        aws_key: model.aws_key,
        profile_id: model.profile_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn attachment_model(id: Uuid) -> attachments::Model {
        attachments::Model {
            id,
            original_name: "photo.png".to_string(),
            encoding: "7bit".to_string(),
            mime_type: "image/png".to_string(),
            url: "https://s3/x".to_string(),
            aws_key: "tmp123.photo.png".to_string(),
            profile_id: Uuid::new_v4(),
            created_at: Utc::now().into(),
        }
    }

    fn vehicle_model(id: Uuid) -> vehicles::Model {
        vehicles::Model {
            id,
            garage_id: Uuid::new_v4(),
            name: "Daily driver".to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    /// Take the connection back from the repository and render every executed statement.
    fn executed_sql(repo: AttachmentRepository, db: Arc<DatabaseConnection>) -> Vec<String> {
        drop(repo);
        Arc::try_unwrap(db)
            .unwrap()
            .into_transaction_log()
            .iter()
            .flat_map(Transaction::statements)
            .map(ToString::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_create_returns_written_record() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let repo = AttachmentRepository::new(Arc::clone(&db));
        let profile_id = Uuid::new_v4();

        let attachment = repo
            .create(CreateAttachmentInput {
                original_name: "photo.png".to_string(),
                encoding: "7bit".to_string(),
                mime_type: "image/png".to_string(),
                url: "https://s3/tmp123.photo.png".to_string(),
                aws_key: "tmp123.photo.png".to_string(),
                profile_id,
            })
            .await
            .unwrap();

        assert_eq!(attachment.aws_key, "tmp123.photo.png");
        assert_eq!(attachment.url, "https://s3/tmp123.photo.png");
        assert_eq!(attachment.profile_id, profile_id);
        assert_eq!(attachment.created_at.timestamp_subsec_nanos() % 1_000, 0);

        let sql = executed_sql(repo, db);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with(r#"INSERT INTO "attachments""#));
        assert!(!sql[0].contains("RETURNING"));
        assert!(sql[0].contains(&attachment.id.to_string()));
        assert!(sql[0].contains("'tmp123.photo.png'"));
    }

    #[tokio::test]
    async fn test_create_surfaces_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("unique violation".to_string())])
            .into_connection();
        let repo = AttachmentRepository::new(Arc::new(db));

        let err = repo
            .create(CreateAttachmentInput {
                original_name: "photo.png".to_string(),
                encoding: "7bit".to_string(),
                mime_type: "image/png".to_string(),
                url: "https://s3/tmp123.photo.png".to_string(),
                aws_key: "tmp123.photo.png".to_string(),
                profile_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AttachmentError::Repository(_)));
    }

    #[tokio::test]
    async fn test_find_by_id_returns_record() {
        let id = Uuid::new_v4();
        let model = attachment_model(id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model.clone()]])
            .into_connection();
        let repo = AttachmentRepository::new(Arc::new(db));

        let attachment = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(attachment.id, id);
        assert_eq!(attachment.aws_key, model.aws_key);
        assert_eq!(attachment.profile_id, model.profile_id);
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<attachments::Model>::new()])
            .into_connection();
        let repo = AttachmentRepository::new(Arc::new(db));

        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_attach_existing_target_inserts_link() {
        let vehicle_id = Uuid::new_v4();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![vehicle_model(vehicle_id)]])
                .append_exec_results([exec_ok()])
                .into_connection(),
        );
        let repo = AttachmentRepository::new(Arc::clone(&db));

        repo.attach(Uuid::new_v4(), AttachmentTarget::Vehicle, vehicle_id)
            .await
            .unwrap();

        let sql = executed_sql(repo, db);
        assert_eq!(sql.len(), 2);
        assert!(sql[0].contains(r#"FROM "vehicles""#));
        assert!(sql[1].starts_with(r#"INSERT INTO "attachment_links""#));
        assert!(sql[1].contains("'vehicle'"));
    }

    #[tokio::test]
    async fn test_attach_missing_target() {
        let garage_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<garages::Model>::new()])
            .into_connection();
        let repo = AttachmentRepository::new(Arc::new(db));

        let err = repo
            .attach(Uuid::new_v4(), AttachmentTarget::Garage, garage_id)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AttachmentError::TargetNotFound {
                target: AttachmentTarget::Garage,
                id
            } if id == garage_id
        ));
    }

    #[tokio::test]
    async fn test_find_link_parses_target_kind() {
        let attachment_id = Uuid::new_v4();
        let log_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![attachment_links::Model {
                attachment_id,
                target_kind: "maintenance-log".to_string(),
                target_id: log_id,
                created_at: Utc::now().into(),
            }]])
            .into_connection();
        let repo = AttachmentRepository::new(Arc::new(db));

        assert_eq!(
            repo.find_link(attachment_id).await.unwrap(),
            Some((AttachmentTarget::MaintenanceLog, log_id))
        );
    }
}
