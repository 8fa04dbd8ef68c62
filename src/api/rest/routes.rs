//! Route table and middleware stack

use super::dto;
use super::handlers;
use crate::api::ws;
use crate::state::AppState;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Campus Portal API", description = "University portal backend"),
    components(schemas(
        dto::RegisterRequest,
        dto::LoginRequest,
        dto::LoginResponse,
        dto::AccountDto,
        dto::AddLecturerRequest,
        dto::AddStudentRequest,
        dto::AccountsListResponse,
        dto::DashboardDto,
        dto::CourseDto,
        dto::CreateCourseRequest,
        dto::CoursesListResponse,
        dto::MaterialDto,
        dto::CourseDetailResponse,
        dto::AssignmentDto,
        dto::CreateAssignmentRequest,
        dto::AssignmentsListResponse,
        dto::SubmissionDto,
        dto::AssignmentDetailResponse,
        dto::ResultDto,
        dto::RecordResultRequest,
        dto::ResultsListResponse,
        dto::ReportsResponse,
        dto::MessageDto,
        dto::MessagesListResponse,
    ))
)]
struct ApiDoc;

/// Build the full application router
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        // auth
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/me", get(handlers::me))
        .route(
            "/auth/me/profile_image",
            post(handlers::upload_profile_image),
        )
        // dashboard
        .route("/dashboard", get(handlers::dashboard))
        // admin
        .route("/admin/students", post(handlers::add_student))
        .route(
            "/admin/students/{user_id}/approve",
            post(handlers::approve_student),
        )
        .route(
            "/admin/lecturers",
            get(handlers::list_lecturers).post(handlers::add_lecturer),
        )
        .route(
            "/admin/lecturers/{user_id}",
            delete(handlers::delete_lecturer),
        )
        .route("/admin/reports", get(handlers::reports_admin))
        .route("/admin/reports/{report}/export", get(handlers::export_report))
        // courses
        .route(
            "/courses",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route("/courses/mine", get(handlers::lecturer_courses))
        .route("/courses/{course_id}", get(handlers::course_detail))
        .route(
            "/courses/{course_id}/materials",
            post(handlers::upload_material),
        )
        // assignments
        .route(
            "/assignments",
            get(handlers::student_assignments).post(handlers::create_assignment),
        )
        .route(
            "/assignments/{assignment_id}",
            get(handlers::assignment_detail),
        )
        .route(
            "/assignments/{assignment_id}/submissions",
            post(handlers::submit_assignment),
        )
        // results
        .route(
            "/results",
            get(handlers::lecturer_results).post(handlers::record_result),
        )
        // chat
        .route("/chat/contacts", get(handlers::chat_contacts))
        .route("/chat/history/{user_id}", get(handlers::chat_history))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));

    Router::new()
        .nest("/api", api)
        .route("/ws/chat/{user_id}", get(ws::chat_socket))
        .nest_service("/media", ServeDir::new(&state.config.media_root))
        .layer(RequestBodyLimitLayer::new(state.config.max_upload_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}
