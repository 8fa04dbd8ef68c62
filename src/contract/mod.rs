//! Contract layer - transport-agnostic models and errors
//!
//! This layer contains the pure domain types shared between services and the
//! API boundary. NO serde derives on models.

pub mod auth;
pub mod error;
pub mod model;

pub use auth::AuthContext;
pub use error::PortalError;
pub use model::{
    Account, Assignment, Course, CourseMaterial, CourseResult, DepartmentCount, Message,
    MessageStatus, NewAccount, NewAssignment, NewCourse, NewMessage, Profile, Role, Submission,
    User, DEPARTMENTS,
};
