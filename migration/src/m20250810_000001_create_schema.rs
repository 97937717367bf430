use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string())
                    .col(ColumnDef::new(Users::Role).integer().not_null())
                    .col(ColumnDef::new(Users::Phone).string())
                    .col(ColumnDef::new(Users::Address).string())
                    .col(ColumnDef::new(Users::Gender).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AcademicYears::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AcademicYears::YearId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AcademicYears::AcademicYearName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AcademicYears::StartDate).date())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Semesters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Semesters::SemesterId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Semesters::SemesterName).string().not_null())
                    .col(ColumnDef::new(Semesters::YearId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Semesters::Table, Semesters::YearId)
                            .to(AcademicYears::Table, AcademicYears::YearId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::ClassId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::ClassName).string().not_null())
                    .col(ColumnDef::new(Classes::HomeroomTeacherId).integer())
                    .col(ColumnDef::new(Classes::YearId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::HomeroomTeacherId)
                            .to(Users::Table, Users::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::YearId)
                            .to(AcademicYears::Table, AcademicYears::YearId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::StudentId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::FullName).string().not_null())
                    .col(ColumnDef::new(Students::ClassId).integer())
                    .col(ColumnDef::new(Students::ParentId).integer())
                    .col(ColumnDef::new(Students::DateOfBirth).date())
                    .col(ColumnDef::new(Students::Gender).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::ClassId)
                            .to(Classes::Table, Classes::ClassId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::ParentId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::SubjectId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::SubjectName).string().not_null())
                    .col(ColumnDef::new(Subjects::TeacherId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::TeacherId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scores::ScoreId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scores::StudentId).integer().not_null())
                    .col(ColumnDef::new(Scores::SubjectId).integer().not_null())
                    .col(ColumnDef::new(Scores::SemesterId).integer().not_null())
                    .col(ColumnDef::new(Scores::YearId).integer().not_null())
                    .col(ColumnDef::new(Scores::Scorehs1).double())
                    .col(ColumnDef::new(Scores::Scorehs2).double())
                    .col(ColumnDef::new(Scores::Scorehs3).double())
                    .col(ColumnDef::new(Scores::ScoreTbm).double())
                    .col(ColumnDef::new(Scores::FinalScore).double())
                    .col(ColumnDef::new(Scores::Conduct).string())
                    .col(ColumnDef::new(Scores::TeacherComment).text())
                    .col(ColumnDef::new(Scores::TeacherId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::StudentId)
                            .to(Students::Table, Students::StudentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::SubjectId)
                            .to(Subjects::Table, Subjects::SubjectId),
                    )
                    .to_owned(),
            )
            .await?;

        // The upsert in routes/teacher.rs conflicts on this exact column set;
        // at most one score row may exist per tuple.
        manager
            .create_index(
                Index::create()
                    .name("ux_scores_student_subject_semester_year")
                    .table(Scores::Table)
                    .col(Scores::StudentId)
                    .col(Scores::SubjectId)
                    .col(Scores::SemesterId)
                    .col(Scores::YearId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Timetable::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Timetable::TimetableId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Timetable::ClassId).integer().not_null())
                    .col(ColumnDef::new(Timetable::SubjectId).integer().not_null())
                    .col(ColumnDef::new(Timetable::TeacherId).integer())
                    .col(ColumnDef::new(Timetable::LessonDate).date().not_null())
                    .col(ColumnDef::new(Timetable::LessonSlot).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Timetable::Table, Timetable::ClassId)
                            .to(Classes::Table, Classes::ClassId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Timetable::Table, Timetable::SubjectId)
                            .to(Subjects::Table, Subjects::SubjectId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::AttendanceId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::StudentId).integer().not_null())
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(ColumnDef::new(Attendance::Status).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendance::Table, Attendance::StudentId)
                            .to(Students::Table, Students::StudentId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeaveRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeaveRequests::RequestId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LeaveRequests::StudentId).integer().not_null())
                    .col(ColumnDef::new(LeaveRequests::ParentId).integer().not_null())
                    .col(ColumnDef::new(LeaveRequests::TeacherId).integer())
                    .col(
                        ColumnDef::new(LeaveRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LeaveRequests::Reason).text().not_null())
                    .col(ColumnDef::new(LeaveRequests::FromDate).date().not_null())
                    .col(ColumnDef::new(LeaveRequests::ToDate).date().not_null())
                    .col(ColumnDef::new(LeaveRequests::Status).string().not_null())
                    .col(ColumnDef::new(LeaveRequests::TeacherNote).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(LeaveRequests::Table, LeaveRequests::StudentId)
                            .to(Students::Table, Students::StudentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LeaveRequests::Table, LeaveRequests::ParentId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Messages::MessageId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Messages::SenderId).integer().not_null())
                    .col(ColumnDef::new(Messages::ReceiverId).integer().not_null())
                    .col(
                        ColumnDef::new(Messages::SentTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Messages::Contents).text().not_null())
                    .col(
                        ColumnDef::new(Messages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::NotificationId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Contents).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::SendWeb)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeaveRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Timetable::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Semesters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicYears::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
    Username,
    Password,
    FullName,
    Email,
    Role,
    Phone,
    Address,
    Gender,
}

#[derive(Iden)]
enum AcademicYears {
    Table,
    YearId,
    AcademicYearName,
    StartDate,
}

#[derive(Iden)]
enum Semesters {
    Table,
    SemesterId,
    SemesterName,
    YearId,
}

#[derive(Iden)]
enum Classes {
    Table,
    ClassId,
    ClassName,
    HomeroomTeacherId,
    YearId,
}

#[derive(Iden)]
enum Students {
    Table,
    StudentId,
    FullName,
    ClassId,
    ParentId,
    DateOfBirth,
    Gender,
}

#[derive(Iden)]
enum Subjects {
    Table,
    SubjectId,
    SubjectName,
    TeacherId,
}

#[derive(Iden)]
enum Scores {
    Table,
    ScoreId,
    StudentId,
    SubjectId,
    SemesterId,
    YearId,
    Scorehs1,
    Scorehs2,
    Scorehs3,
    ScoreTbm,
    FinalScore,
    Conduct,
    TeacherComment,
    TeacherId,
}

#[derive(Iden)]
enum Timetable {
    Table,
    TimetableId,
    ClassId,
    SubjectId,
    TeacherId,
    LessonDate,
    LessonSlot,
}

#[derive(Iden)]
enum Attendance {
    Table,
    AttendanceId,
    StudentId,
    Date,
    Status,
}

#[derive(Iden)]
enum LeaveRequests {
    Table,
    RequestId,
    StudentId,
    ParentId,
    TeacherId,
    CreatedAt,
    Reason,
    FromDate,
    ToDate,
    Status,
    TeacherNote,
}

#[derive(Iden)]
enum Messages {
    Table,
    MessageId,
    SenderId,
    ReceiverId,
    SentTime,
    Contents,
    IsRead,
}

#[derive(Iden)]
enum Notifications {
    Table,
    NotificationId,
    Title,
    Contents,
    CreatedAt,
    SendWeb,
}
