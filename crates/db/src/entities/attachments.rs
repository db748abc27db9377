//! `SeaORM` Entity for attachments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub original_name: String,
    pub encoding: String,
    pub mime_type: String,
    pub url: String,
    #[sea_orm(unique)]
    pub aws_key: String,
    pub profile_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::attachment_links::Entity")]
    AttachmentLinks,
}

impl Related<super::attachment_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttachmentLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
