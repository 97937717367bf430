use sea_orm::entity::prelude::*;

pub const STATUS_PENDING: &str = "Pending";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leave_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub request_id: i32,
    pub student_id: i32,
    pub parent_id: i32,
    /// Homeroom teacher at creation time; NULL when the student's class has
    /// none (the request is still created).
    pub teacher_id: Option<i32>,
    pub created_at: DateTimeUtc,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub from_date: Date,
    pub to_date: Date,
    /// "Pending" | "Approved" | "Rejected".
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::StudentId"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ParentId",
        to = "super::user::Column::UserId"
    )]
    Parent,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::UserId"
    )]
    Teacher,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
