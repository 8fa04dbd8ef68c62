//! Database migrations for the campus portal

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_profiles::Migration),
            Box::new(m20250301_000003_create_courses::Migration),
            Box::new(m20250301_000004_create_course_materials::Migration),
            Box::new(m20250301_000005_create_assignments::Migration),
            Box::new(m20250301_000006_create_submissions::Migration),
            Box::new(m20250301_000007_create_messages::Migration),
            Box::new(m20250301_000008_create_results::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    UserId,
    Role,
    LecturerId,
    Department,
    IsApproved,
    ProfileImage,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    Title,
    Description,
    Department,
    LecturerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CourseMaterials {
    Table,
    Id,
    CourseId,
    Title,
    FilePath,
    UploadedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    Table,
    Id,
    Title,
    Description,
    LecturerId,
    CourseId,
    CreatedAt,
    DueDate,
}

#[derive(DeriveIden)]
enum Submissions {
    Table,
    Id,
    AssignmentId,
    StudentId,
    FilePath,
    Feedback,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    SenderId,
    RecipientId,
    Body,
    AudioPath,
    AttachmentPath,
    ClientId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Results {
    Table,
    Id,
    StudentId,
    CourseId,
    Score,
    Grade,
}

mod m20250301_000001_create_users {
    use super::*;

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
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string_len(150)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Email).string_len(254).not_null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000002_create_profiles {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Profiles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Profiles::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Profiles::UserId)
                                .big_integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Profiles::Role).string_len(10).not_null())
                        .col(ColumnDef::new(Profiles::LecturerId).string_len(20))
                        .col(ColumnDef::new(Profiles::Department).string_len(100))
                        .col(
                            ColumnDef::new(Profiles::IsApproved)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Profiles::ProfileImage).string())
                        .col(
                            ColumnDef::new(Profiles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_profiles_user")
                                .from(Profiles::Table, Profiles::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_profiles_role")
                        .table(Profiles::Table)
                        .col(Profiles::Role)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_profiles_department")
                        .table(Profiles::Table)
                        .col(Profiles::Department)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Profiles::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000003_create_courses {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Courses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Courses::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Courses::Title).string_len(200).not_null())
                        .col(ColumnDef::new(Courses::Description).text().not_null())
                        .col(
                            ColumnDef::new(Courses::Department)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Courses::LecturerId).big_integer())
                        .col(
                            ColumnDef::new(Courses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_courses_lecturer")
                                .from(Courses::Table, Courses::LecturerId)
                                .to(Profiles::Table, Profiles::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_courses_department")
                        .table(Courses::Table)
                        .col(Courses::Department)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Courses::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000004_create_course_materials {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CourseMaterials::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CourseMaterials::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(CourseMaterials::CourseId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CourseMaterials::Title)
                                .string_len(200)
                                .not_null(),
                        )
                        .col(ColumnDef::new(CourseMaterials::FilePath).string().not_null())
                        .col(
                            ColumnDef::new(CourseMaterials::UploadedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_course_materials_course")
                                .from(CourseMaterials::Table, CourseMaterials::CourseId)
                                .to(Courses::Table, Courses::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CourseMaterials::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000005_create_assignments {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Assignments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Assignments::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Assignments::Title)
                                .string_len(200)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Assignments::Description).text().not_null())
                        .col(ColumnDef::new(Assignments::LecturerId).big_integer())
                        .col(ColumnDef::new(Assignments::CourseId).big_integer())
                        .col(
                            ColumnDef::new(Assignments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(ColumnDef::new(Assignments::DueDate).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_assignments_lecturer")
                                .from(Assignments::Table, Assignments::LecturerId)
                                .to(Profiles::Table, Profiles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_assignments_course")
                                .from(Assignments::Table, Assignments::CourseId)
                                .to(Courses::Table, Courses::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Assignments::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000006_create_submissions {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Submissions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Submissions::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Submissions::AssignmentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Submissions::StudentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Submissions::FilePath).string().not_null())
                        .col(
                            ColumnDef::new(Submissions::Feedback)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Submissions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_submissions_assignment")
                                .from(Submissions::Table, Submissions::AssignmentId)
                                .to(Assignments::Table, Assignments::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_submissions_student")
                                .from(Submissions::Table, Submissions::StudentId)
                                .to(Profiles::Table, Profiles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Submissions::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000007_create_messages {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Messages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Messages::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Messages::SenderId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Messages::RecipientId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Messages::Body).text())
                        .col(ColumnDef::new(Messages::AudioPath).string())
                        .col(ColumnDef::new(Messages::AttachmentPath).string())
                        .col(ColumnDef::new(Messages::ClientId).string_len(100))
                        .col(
                            ColumnDef::new(Messages::Status)
                                .string_len(20)
                                .not_null()
                                .default("sent"),
                        )
                        .col(
                            ColumnDef::new(Messages::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_messages_sender")
                                .from(Messages::Table, Messages::SenderId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_messages_recipient")
                                .from(Messages::Table, Messages::RecipientId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Conversation scans filter on both participant columns
            manager
                .create_index(
                    Index::create()
                        .name("idx_messages_sender")
                        .table(Messages::Table)
                        .col(Messages::SenderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_messages_recipient")
                        .table(Messages::Table)
                        .col(Messages::RecipientId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Messages::Table).to_owned())
                .await
        }
    }
}

mod m20250301_000008_create_results {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Results::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Results::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Results::StudentId).big_integer().not_null())
                        .col(ColumnDef::new(Results::CourseId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Results::Score)
                                .decimal_len(5, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Results::Grade).string_len(2))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_results_student")
                                .from(Results::Table, Results::StudentId)
                                .to(Profiles::Table, Profiles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_results_course")
                                .from(Results::Table, Results::CourseId)
                                .to(Courses::Table, Courses::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Results::Table).to_owned())
                .await
        }
    }
}
