//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    Account, Assignment, Course, CourseMaterial, CourseResult, DepartmentCount, Message,
    MessageStatus, NewAccount, NewAssignment, NewCourse, NewMessage, Profile, Role, Submission,
    User,
};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Repository for user accounts and their profiles
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create a user and its profile in one transaction
    async fn create(&self, account: NewAccount) -> Result<Account>;

    async fn find_user(&self, user_id: i64) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_profile_by_user(&self, user_id: i64) -> Result<Option<Profile>>;

    async fn username_exists(&self, username: &str) -> Result<bool>;

    async fn lecturer_id_exists(&self, lecturer_id: &str) -> Result<bool>;

    /// Mark a profile approved
    async fn set_approved(&self, user_id: i64, approved: bool) -> Result<()>;

    /// Store the media-relative profile image path
    async fn set_profile_image(&self, user_id: i64, path: &str) -> Result<()>;

    /// Delete a user together with its profile
    async fn delete_user(&self, user_id: i64) -> Result<()>;

    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>>;

    /// Students awaiting approval
    async fn list_pending_students(&self) -> Result<Vec<Account>>;

    async fn count_by_role(&self, role: Role) -> Result<u64>;

    async fn count_students_in_department(&self, department: &str) -> Result<u64>;

    /// Student head-counts grouped by department, descending
    async fn count_students_by_department(&self) -> Result<Vec<DepartmentCount>>;
}

/// Repository for courses and their materials
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: NewCourse) -> Result<Course>;

    async fn find(&self, course_id: i64) -> Result<Option<Course>>;

    async fn list_all(&self) -> Result<Vec<Course>>;

    async fn list_by_department(&self, department: &str) -> Result<Vec<Course>>;

    async fn list_by_lecturer(&self, lecturer_profile_id: i64) -> Result<Vec<Course>>;

    async fn count(&self) -> Result<u64>;

    async fn add_material(
        &self,
        course_id: i64,
        title: &str,
        file_path: &str,
    ) -> Result<CourseMaterial>;

    async fn materials_for(&self, course_id: i64) -> Result<Vec<CourseMaterial>>;
}

/// Repository for assignments and submissions
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, assignment: NewAssignment) -> Result<Assignment>;

    async fn find(&self, assignment_id: i64) -> Result<Option<Assignment>>;

    async fn list_by_course(&self, course_id: i64) -> Result<Vec<Assignment>>;

    /// Assignments attached to any course in the department
    async fn list_by_department(&self, department: &str) -> Result<Vec<Assignment>>;

    async fn count(&self) -> Result<u64>;

    async fn add_submission(
        &self,
        assignment_id: i64,
        student_profile_id: i64,
        file_path: &str,
    ) -> Result<Submission>;

    async fn submissions_for(&self, assignment_id: i64) -> Result<Vec<Submission>>;
}

/// Repository for course results
#[async_trait]
pub trait ResultRepository: Send + Sync {
    async fn record(
        &self,
        student_profile_id: i64,
        course_id: i64,
        score: Decimal,
        grade: Option<&str>,
    ) -> Result<CourseResult>;

    /// Results for any of the given courses
    async fn list_for_courses(&self, course_ids: &[i64]) -> Result<Vec<CourseResult>>;
}

/// Repository for one-to-one chat messages
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(
        &self,
        sender_id: i64,
        recipient_id: i64,
        message: NewMessage,
    ) -> Result<Message>;

    /// All messages between two users, oldest first
    async fn conversation(&self, user_a: i64, user_b: i64) -> Result<Vec<Message>>;

    /// Update the delivery status of the given message ids
    async fn set_status(&self, message_ids: &[i64], status: MessageStatus) -> Result<()>;
}
