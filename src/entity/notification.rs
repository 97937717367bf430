use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub notification_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub contents: String,
    pub created_at: DateTimeUtc,
    /// Only rows with `send_web = true` are exposed on the web feed.
    pub send_web: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
