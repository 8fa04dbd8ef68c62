//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== Auth DTOs =====

/// Self-registration request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// "student" or "lecturer"
    #[schema(example = "student")]
    pub role: String,
    #[schema(example = "Computer Science")]
    pub department: String,
}

/// Role login request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Claimed role, must match the profile
    #[schema(example = "lecturer")]
    pub role: String,
    /// Staff id, required for lecturer logins
    pub lecturer_id: Option<String>,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    pub user_id: i64,
    pub role: String,
}

/// Account response DTO (user + profile)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountDto {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lecturer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub is_approved: bool,
    /// URL of the profile image, when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Create-lecturer request (admin)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddLecturerRequest {
    pub username: String,
    pub email: String,
    pub lecturer_id: String,
    pub password: String,
    pub department: Option<String>,
}

/// Create-student request (admin)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddStudentRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub department: String,
}

/// Accounts list response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountsListResponse {
    pub items: Vec<AccountDto>,
    pub total: usize,
}

// ===== Dashboard DTOs =====

/// Role-shaped dashboard context
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardDto {
    Admin {
        pending_students: Vec<AccountDto>,
        lecturers: Vec<AccountDto>,
        total_students: u64,
        total_lecturers: u64,
        total_courses: u64,
        total_assignments: u64,
    },
    Lecturer {
        courses: Vec<CourseDto>,
        pending_assignments: Vec<AssignmentDto>,
        students_count: u64,
    },
    Student {
        courses: Vec<CourseDto>,
        assignments: Vec<AssignmentDto>,
    },
}

// ===== Course DTOs =====

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lecturer_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    #[schema(example = "Networking")]
    pub department: String,
    /// Lecturer user id; admins may assign, lecturers always own the course
    pub lecturer_user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CoursesListResponse {
    pub items: Vec<CourseDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaterialDto {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    /// Download URL under /media/
    pub file: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// Course with its materials and assignments
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CourseDetailResponse {
    pub course: CourseDto,
    pub materials: Vec<MaterialDto>,
    pub assignments: Vec<AssignmentDto>,
}

// ===== Assignment DTOs =====

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssignmentDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lecturer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: String,
    pub course_id: Option<i64>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssignmentsListResponse {
    pub items: Vec<AssignmentDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionDto {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    /// Download URL under /media/
    pub file: String,
    pub feedback: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Assignment with its submissions
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssignmentDetailResponse {
    pub assignment: AssignmentDto,
    pub submissions: Vec<SubmissionDto>,
}

// ===== Result DTOs =====

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResultDto {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    #[schema(value_type = String, example = "87.50")]
    pub score: rust_decimal::Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordResultRequest {
    pub student_user_id: i64,
    pub course_id: i64,
    #[schema(value_type = String, example = "87.50")]
    pub score: rust_decimal::Decimal,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResultsListResponse {
    pub items: Vec<ResultDto>,
    pub total: usize,
}

// ===== Report DTOs =====

/// Student head-counts per department, chart-ready
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportsResponse {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

// ===== Chat DTOs =====

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageDto {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Voice note URL under /media/
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_note: Option<String>,
    /// Attachment URL under /media/
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessagesListResponse {
    pub items: Vec<MessageDto>,
    pub total: usize,
}
