//! Domain layer - business logic and services

pub mod auth;
pub mod chat;
pub mod courses;
pub mod reports;
pub mod repository;
pub mod rooms;
pub mod validation;

pub use auth::{AuthService, LoginRequest, NewLecturer, NewStudent, Registration, TokenSigner};
pub use chat::ChatService;
pub use courses::{AssignmentDetail, CourseDetail, CourseService, Dashboard};
pub use reports::{CsvExport, ReportKind, ReportService};
pub use repository::{
    AccountRepository, AssignmentRepository, CourseRepository, MessageRepository, ResultRepository,
};
pub use rooms::{ChatEvent, Presence, RoomKey, RoomRegistry};
