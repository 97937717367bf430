use sea_orm::entity::prelude::*;

/// One score row per (student, subject, semester, year) tuple; the composite
/// uniqueness is enforced by `ux_scores_student_subject_semester_year` and
/// relied on by the save-score upsert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub score_id: i32,
    pub student_id: i32,
    pub subject_id: i32,
    pub semester_id: i32,
    pub year_id: i32,
    pub scorehs1: Option<f64>,
    pub scorehs2: Option<f64>,
    pub scorehs3: Option<f64>,
    /// Per-subject average. Maintained outside the upsert workflow.
    pub score_tbm: Option<f64>,
    /// Semester-wide average. Maintained outside the upsert workflow.
    pub final_score: Option<f64>,
    pub conduct: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_comment: Option<String>,
    /// Last writer.
    pub teacher_id: Option<i32>,
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
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::SubjectId"
    )]
    Subject,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
