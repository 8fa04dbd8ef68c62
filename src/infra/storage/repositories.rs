//! SeaORM repository implementations

use crate::contract::{
    Account, Assignment, Course, CourseMaterial, CourseResult, DepartmentCount, Message,
    MessageStatus, NewAccount, NewAssignment, NewCourse, NewMessage, Profile, Role, Submission,
    User,
};
use crate::domain::repository::{
    AccountRepository, AssignmentRepository, CourseRepository, MessageRepository, ResultRepository,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use sea_orm::sea_query::Expr;
use std::sync::Arc;

use super::entity;

// ===== Accounts =====

pub struct SeaOrmAccountRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAccountRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        let user = entity::user::ActiveModel {
            username: Set(account.username),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("inserting user")?;

        let profile = entity::profile::ActiveModel {
            user_id: Set(user.id),
            role: Set(account.role.into()),
            lecturer_id: Set(account.lecturer_id),
            department: Set(account.department),
            is_approved: Set(account.is_approved),
            profile_image: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("inserting profile")?;

        txn.commit().await?;
        Ok(Account {
            user: user.into(),
            profile: profile.into(),
        })
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        let result = entity::user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let result = entity::user::Entity::find()
            .filter(entity::user::Column::Username.eq(username))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_profile_by_user(&self, user_id: i64) -> Result<Option<Profile>> {
        let result = entity::profile::Entity::find()
            .filter(entity::profile::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        let count = entity::user::Entity::find()
            .filter(entity::user::Column::Username.eq(username))
            .count(&*self.db)
            .await?;
        Ok(count > 0)
    }

    async fn lecturer_id_exists(&self, lecturer_id: &str) -> Result<bool> {
        let count = entity::profile::Entity::find()
            .filter(entity::profile::Column::LecturerId.eq(lecturer_id))
            .count(&*self.db)
            .await?;
        Ok(count > 0)
    }

    async fn set_approved(&self, user_id: i64, approved: bool) -> Result<()> {
        entity::profile::Entity::update_many()
            .col_expr(entity::profile::Column::IsApproved, Expr::value(approved))
            .filter(entity::profile::Column::UserId.eq(user_id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn set_profile_image(&self, user_id: i64, path: &str) -> Result<()> {
        entity::profile::Entity::update_many()
            .col_expr(
                entity::profile::Column::ProfileImage,
                Expr::value(Some(path.to_string())),
            )
            .filter(entity::profile::Column::UserId.eq(user_id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: i64) -> Result<()> {
        let txn = self.db.begin().await?;
        entity::profile::Entity::delete_many()
            .filter(entity::profile::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        entity::user::Entity::delete_by_id(user_id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>> {
        let rows = entity::profile::Entity::find()
            .filter(entity::profile::Column::Role.eq(entity::Role::from(role)))
            .find_also_related(entity::user::Entity)
            .order_by_asc(entity::profile::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(profile, user)| {
                user.map(|user| Account {
                    user: user.into(),
                    profile: profile.into(),
                })
            })
            .collect())
    }

    async fn list_pending_students(&self) -> Result<Vec<Account>> {
        let rows = entity::profile::Entity::find()
            .filter(entity::profile::Column::Role.eq(entity::Role::Student))
            .filter(entity::profile::Column::IsApproved.eq(false))
            .find_also_related(entity::user::Entity)
            .order_by_asc(entity::profile::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(profile, user)| {
                user.map(|user| Account {
                    user: user.into(),
                    profile: profile.into(),
                })
            })
            .collect())
    }

    async fn count_by_role(&self, role: Role) -> Result<u64> {
        let count = entity::profile::Entity::find()
            .filter(entity::profile::Column::Role.eq(entity::Role::from(role)))
            .count(&*self.db)
            .await?;
        Ok(count)
    }

    async fn count_students_in_department(&self, department: &str) -> Result<u64> {
        let count = entity::profile::Entity::find()
            .filter(entity::profile::Column::Role.eq(entity::Role::Student))
            .filter(entity::profile::Column::Department.eq(department))
            .count(&*self.db)
            .await?;
        Ok(count)
    }

    async fn count_students_by_department(&self) -> Result<Vec<DepartmentCount>> {
        let rows: Vec<(Option<String>, i64)> = entity::profile::Entity::find()
            .select_only()
            .column(entity::profile::Column::Department)
            .column_as(entity::profile::Column::Id.count(), "count")
            .filter(entity::profile::Column::Role.eq(entity::Role::Student))
            .group_by(entity::profile::Column::Department)
            .into_tuple()
            .all(&*self.db)
            .await?;

        let mut counts: Vec<DepartmentCount> = rows
            .into_iter()
            .map(|(department, count)| DepartmentCount {
                department: department.unwrap_or_default(),
                count: count.max(0) as u64,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }
}

// ===== Courses =====

pub struct SeaOrmCourseRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCourseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseRepository for SeaOrmCourseRepository {
    async fn create(&self, course: NewCourse) -> Result<Course> {
        let model = entity::course::ActiveModel {
            title: Set(course.title),
            description: Set(course.description),
            department: Set(course.department),
            lecturer_id: Set(course.lecturer_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(model.into())
    }

    async fn find(&self, course_id: i64) -> Result<Option<Course>> {
        let result = entity::course::Entity::find_by_id(course_id)
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Course>> {
        let results = entity::course::Entity::find()
            .order_by_asc(entity::course::Column::Title)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn list_by_department(&self, department: &str) -> Result<Vec<Course>> {
        let results = entity::course::Entity::find()
            .filter(entity::course::Column::Department.eq(department))
            .order_by_asc(entity::course::Column::Title)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn list_by_lecturer(&self, lecturer_profile_id: i64) -> Result<Vec<Course>> {
        let results = entity::course::Entity::find()
            .filter(entity::course::Column::LecturerId.eq(lecturer_profile_id))
            .order_by_asc(entity::course::Column::Title)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(entity::course::Entity::find().count(&*self.db).await?)
    }

    async fn add_material(
        &self,
        course_id: i64,
        title: &str,
        file_path: &str,
    ) -> Result<CourseMaterial> {
        let model = entity::course_material::ActiveModel {
            course_id: Set(course_id),
            title: Set(title.to_string()),
            file_path: Set(file_path.to_string()),
            uploaded_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(model.into())
    }

    async fn materials_for(&self, course_id: i64) -> Result<Vec<CourseMaterial>> {
        let results = entity::course_material::Entity::find()
            .filter(entity::course_material::Column::CourseId.eq(course_id))
            .order_by_asc(entity::course_material::Column::UploadedAt)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }
}

// ===== Assignments =====

pub struct SeaOrmAssignmentRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAssignmentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssignmentRepository for SeaOrmAssignmentRepository {
    async fn create(&self, assignment: NewAssignment) -> Result<Assignment> {
        let model = entity::assignment::ActiveModel {
            title: Set(assignment.title),
            description: Set(assignment.description),
            lecturer_id: Set(assignment.lecturer_id),
            course_id: Set(assignment.course_id),
            created_at: Set(Utc::now()),
            due_date: Set(assignment.due_date),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(model.into())
    }

    async fn find(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = entity::assignment::Entity::find_by_id(assignment_id)
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list_by_course(&self, course_id: i64) -> Result<Vec<Assignment>> {
        let results = entity::assignment::Entity::find()
            .filter(entity::assignment::Column::CourseId.eq(course_id))
            .order_by_asc(entity::assignment::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn list_by_department(&self, department: &str) -> Result<Vec<Assignment>> {
        let course_ids: Vec<i64> = entity::course::Entity::find()
            .select_only()
            .column(entity::course::Column::Id)
            .filter(entity::course::Column::Department.eq(department))
            .into_tuple()
            .all(&*self.db)
            .await?;

        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = entity::assignment::Entity::find()
            .filter(entity::assignment::Column::CourseId.is_in(course_ids))
            .order_by_asc(entity::assignment::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(entity::assignment::Entity::find().count(&*self.db).await?)
    }

    async fn add_submission(
        &self,
        assignment_id: i64,
        student_profile_id: i64,
        file_path: &str,
    ) -> Result<Submission> {
        let model = entity::submission::ActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_profile_id),
            file_path: Set(file_path.to_string()),
            feedback: Set(String::new()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(model.into())
    }

    async fn submissions_for(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        let results = entity::submission::Entity::find()
            .filter(entity::submission::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(entity::submission::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }
}

// ===== Results =====

pub struct SeaOrmResultRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmResultRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResultRepository for SeaOrmResultRepository {
    async fn record(
        &self,
        student_profile_id: i64,
        course_id: i64,
        score: Decimal,
        grade: Option<&str>,
    ) -> Result<CourseResult> {
        let model = entity::result::ActiveModel {
            student_id: Set(student_profile_id),
            course_id: Set(course_id),
            score: Set(score),
            grade: Set(grade.map(ToString::to_string)),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(model.into())
    }

    async fn list_for_courses(&self, course_ids: &[i64]) -> Result<Vec<CourseResult>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        let results = entity::result::Entity::find()
            .filter(entity::result::Column::CourseId.is_in(course_ids.iter().copied()))
            .order_by_asc(entity::result::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }
}

// ===== Messages =====

pub struct SeaOrmMessageRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmMessageRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for SeaOrmMessageRepository {
    async fn create(
        &self,
        sender_id: i64,
        recipient_id: i64,
        message: NewMessage,
    ) -> Result<Message> {
        let model = entity::message::ActiveModel {
            sender_id: Set(sender_id),
            recipient_id: Set(recipient_id),
            body: Set(message.body),
            audio_path: Set(message.audio_path),
            attachment_path: Set(message.attachment_path),
            client_id: Set(message.client_id),
            status: Set(entity::MessageStatus::Sent),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(model.into())
    }

    async fn conversation(&self, user_a: i64, user_b: i64) -> Result<Vec<Message>> {
        let results = entity::message::Entity::find()
            .filter(entity::message::Column::SenderId.is_in([user_a, user_b]))
            .filter(entity::message::Column::RecipientId.is_in([user_a, user_b]))
            .order_by_asc(entity::message::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn set_status(&self, message_ids: &[i64], status: MessageStatus) -> Result<()> {
        entity::message::Entity::update_many()
            .col_expr(
                entity::message::Column::Status,
                Expr::value(entity::MessageStatus::from(status)),
            )
            .filter(entity::message::Column::Id.is_in(message_ids.iter().copied()))
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}
