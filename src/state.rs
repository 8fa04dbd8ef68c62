//! Shared application state injected into handlers

use crate::config::Config;
use crate::domain::{AuthService, ChatService, CourseService, ReportService, RoomRegistry};
use crate::infra::media::MediaStore;

/// Everything a handler needs, shared behind an Arc
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub courses: CourseService,
    pub chat: ChatService,
    pub reports: ReportService,
    pub rooms: RoomRegistry,
    pub media: MediaStore,
}
