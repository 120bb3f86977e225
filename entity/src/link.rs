use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "link")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    /// Short-link group, the `element` segment of the redirect URL.
    pub group_name: String,
    pub link_type: String,
    pub url: String,
    pub active: bool,
    pub password: Option<String>,
    /// Cached page-meta tags of the target, refreshed on update.
    pub meta_tags: Json,
    pub created_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
