//! Contract models for the campus portal
//!
//! These models are transport-agnostic and shared between the domain layer
//! and the API boundary. NO serde derives - these are pure domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Fixed list of departments offered by the institution
pub const DEPARTMENTS: &[&str] = &[
    "Computer Software Engineering",
    "Computer Science",
    "Computer Hardware Engineering",
    "Computer Engineering",
    "Accountancy",
    "Networking",
];

/// Account role attached to a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Lecturer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Lecturer => "lecturer",
            Self::Admin => "admin",
        }
    }

    /// Parse a role string, tolerating surrounding whitespace and case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "lecturer" => Some(Self::Lecturer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery status of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Sent,
    Delivered,
    Seen,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Seen => "seen",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            "seen" => Some(Self::Seen),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC-format hash, never the raw password
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Role-tagged record attached one-to-one to a user account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub role: Role,
    /// Staff identifier, present for lecturers only
    pub lecturer_id: Option<String>,
    pub department: Option<String>,
    pub is_approved: bool,
    /// Media-relative path of the profile image
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile joined with the account it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub user: User,
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub department: String,
    /// Owning lecturer profile; cleared when the lecturer is removed
    pub lecturer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseMaterial {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    /// Media-relative path of the uploaded file
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub lecturer_id: Option<i64>,
    pub course_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_path: String,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

/// One-to-one chat message between two user accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub body: Option<String>,
    /// Media-relative path of a voice note
    pub audio_path: Option<String>,
    /// Media-relative path of a file attachment
    pub attachment_path: Option<String>,
    /// Client-generated id used for optimistic UI reconciliation
    pub client_id: Option<String>,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

/// New chat message prior to persistence
#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub body: Option<String>,
    pub audio_path: Option<String>,
    pub attachment_path: Option<String>,
    pub client_id: Option<String>,
}

/// New account prior to persistence; the profile row is created together
/// with the user row
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub lecturer_id: Option<String>,
    pub department: Option<String>,
    pub is_approved: bool,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub department: String,
    pub lecturer_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub lecturer_id: Option<i64>,
    pub course_id: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Recorded score for a student on a course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseResult {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub score: Decimal,
    pub grade: Option<String>,
}

/// Student head-count for one department
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentCount {
    pub department: String,
    pub count: u64,
}
