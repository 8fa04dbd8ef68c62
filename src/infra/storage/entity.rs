//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Role column values, stored as strings
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Role {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "lecturer")]
    Lecturer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Message status column values, stored as strings
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum MessageStatus {
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "seen")]
    Seen,
}

/// User accounts table
pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub username: String,
        pub email: String,
        pub password_hash: String,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_one = "super::profile::Entity")]
        Profile,
    }

    impl Related<super::profile::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Profile.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Profiles table, one row per user
pub mod profile {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "profiles")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub user_id: i64,
        pub role: Role,
        pub lecturer_id: Option<String>,
        pub department: Option<String>,
        pub is_approved: bool,
        pub profile_image: Option<String>,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::UserId",
            to = "super::user::Column::Id"
        )]
        User,
    }

    impl Related<super::user::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::User.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Courses table
pub mod course {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "courses")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub title: String,
        pub description: String,
        pub department: String,
        pub lecturer_id: Option<i64>,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::profile::Entity",
            from = "Column::LecturerId",
            to = "super::profile::Column::Id"
        )]
        Lecturer,
        #[sea_orm(has_many = "super::course_material::Entity")]
        Materials,
    }

    impl Related<super::course_material::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Materials.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Course materials table
pub mod course_material {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "course_materials")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub course_id: i64,
        pub title: String,
        pub file_path: String,
        pub uploaded_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::course::Entity",
            from = "Column::CourseId",
            to = "super::course::Column::Id"
        )]
        Course,
    }

    impl Related<super::course::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Course.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Assignments table
pub mod assignment {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "assignments")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub title: String,
        pub description: String,
        pub lecturer_id: Option<i64>,
        pub course_id: Option<i64>,
        pub created_at: DateTimeUtc,
        pub due_date: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::course::Entity",
            from = "Column::CourseId",
            to = "super::course::Column::Id"
        )]
        Course,
        #[sea_orm(has_many = "super::submission::Entity")]
        Submissions,
    }

    impl Related<super::submission::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Submissions.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Assignment submissions table
pub mod submission {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "submissions")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub assignment_id: i64,
        pub student_id: i64,
        pub file_path: String,
        pub feedback: String,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::assignment::Entity",
            from = "Column::AssignmentId",
            to = "super::assignment::Column::Id"
        )]
        Assignment,
        #[sea_orm(
            belongs_to = "super::profile::Entity",
            from = "Column::StudentId",
            to = "super::profile::Column::Id"
        )]
        Student,
    }

    impl Related<super::assignment::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Assignment.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// One-to-one chat messages table
pub mod message {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "messages")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub sender_id: i64,
        pub recipient_id: i64,
        pub body: Option<String>,
        pub audio_path: Option<String>,
        pub attachment_path: Option<String>,
        pub client_id: Option<String>,
        pub status: MessageStatus,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::SenderId",
            to = "super::user::Column::Id"
        )]
        Sender,
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::RecipientId",
            to = "super::user::Column::Id"
        )]
        Recipient,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Course results table
pub mod result {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "results")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub student_id: i64,
        pub course_id: i64,
        #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
        pub score: Decimal,
        pub grade: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::profile::Entity",
            from = "Column::StudentId",
            to = "super::profile::Column::Id"
        )]
        Student,
        #[sea_orm(
            belongs_to = "super::course::Entity",
            from = "Column::CourseId",
            to = "super::course::Column::Id"
        )]
        Course,
    }

    impl ActiveModelBehavior for ActiveModel {}
}
