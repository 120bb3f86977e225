use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "stack_technology")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub stack: Uuid,
    pub technology: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stack::Entity",
        from = "Column::Stack",
        to = "super::stack::Column::Id"
    )]
    Stack,
    #[sea_orm(
        belongs_to = "super::technology::Entity",
        from = "Column::Technology",
        to = "super::technology::Column::Id"
    )]
    Technology,
}

impl Related<super::stack::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stack.def()
    }
}

impl Related<super::technology::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Technology.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
