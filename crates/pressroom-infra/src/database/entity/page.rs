//! Page entity for SeaORM. Layout and components live in JSONB columns.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use pressroom_core::domain::{Component, Page, components_from_json};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub layout: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub components: Json,
    pub created_by: Uuid,
    pub is_published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Serialize the component list for a JSONB column.
pub(crate) fn components_json(components: &[Component]) -> Json {
    serde_json::to_value(components).unwrap_or_else(|_| Json::Array(Vec::new()))
}

impl From<Model> for Page {
    fn from(model: Model) -> Self {
        let layout = match model.layout {
            Json::Array(items) => items,
            _ => Vec::new(),
        };

        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            layout,
            components: components_from_json(model.components),
            created_by: model.created_by,
            is_published: model.is_published,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Page> for ActiveModel {
    fn from(page: Page) -> Self {
        Self {
            id: Set(page.id),
            title: Set(page.title),
            slug: Set(page.slug),
            components: Set(components_json(&page.components)),
            layout: Set(Json::Array(page.layout)),
            created_by: Set(page.created_by),
            is_published: Set(page.is_published),
            created_at: Set(page.created_at.into()),
            updated_at: Set(page.updated_at.into()),
        }
    }
}
