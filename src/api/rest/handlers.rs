//! HTTP request handlers - thin layer that delegates to domain services

use super::dto::*;
use super::error::{map_domain_error, Problem};
use super::extract::AuthUser;
use crate::contract::Role;
use crate::domain::{LoginRequest as DomainLogin, NewLecturer, NewStudent, Registration, ReportKind};
use crate::infra::media::MediaKind;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

// ===== Auth =====

pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountDto>), Problem> {
    let role = parse_role(&req.role)?;
    let account = state
        .auth
        .register(Registration {
            username: req.username,
            email: req.email,
            password: req.password,
            role,
            department: req.department,
        })
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, Problem> {
    let role = parse_role(&req.role)?;
    let (token, account) = state
        .auth
        .login(DomainLogin {
            username: req.username,
            password: req.password,
            role,
            lecturer_id: req.lecturer_id,
        })
        .await
        .map_err(map_domain_error)?;
    Ok(Json(LoginResponse {
        token,
        user_id: account.user.id,
        role: account.profile.role.as_str().to_string(),
    }))
}

/// The caller's own account
pub async fn me(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<AccountDto>, Problem> {
    let account = state
        .auth
        .account(ctx.user_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(account.into()))
}

/// Multipart upload of the caller's profile image (field: `file`)
pub async fn upload_profile_image(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    multipart: Multipart,
) -> Result<Json<AccountDto>, Problem> {
    let upload = read_upload(multipart).await?;
    let file = upload.file.ok_or_else(|| {
        Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
            .with_detail("missing file field")
    })?;

    let path = state
        .media
        .save(MediaKind::Profiles, &file.0, &file.1)
        .await
        .map_err(media_problem)?;

    let account = state
        .auth
        .set_profile_image(&ctx, path)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(account.into()))
}

// ===== Dashboard =====

pub async fn dashboard(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<DashboardDto>, Problem> {
    let dashboard = state
        .courses
        .dashboard(&ctx)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(dashboard.into()))
}

// ===== Admin =====

pub async fn approve_student(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, Problem> {
    state
        .auth
        .approve_student(&ctx, user_id)
        .await
        .map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_student(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<AddStudentRequest>,
) -> Result<(StatusCode, Json<AccountDto>), Problem> {
    let account = state
        .auth
        .add_student(
            &ctx,
            NewStudent {
                username: req.username,
                email: req.email,
                password: req.password,
                department: req.department,
            },
        )
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

pub async fn add_lecturer(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<AddLecturerRequest>,
) -> Result<(StatusCode, Json<AccountDto>), Problem> {
    let account = state
        .auth
        .add_lecturer(
            &ctx,
            NewLecturer {
                username: req.username,
                email: req.email,
                lecturer_id: req.lecturer_id,
                password: req.password,
                department: req.department,
            },
        )
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

pub async fn delete_lecturer(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, Problem> {
    state
        .auth
        .delete_lecturer(&ctx, user_id)
        .await
        .map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_lecturers(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<AccountsListResponse>, Problem> {
    let lecturers = state
        .auth
        .list_lecturers(&ctx)
        .await
        .map_err(map_domain_error)?;
    let items: Vec<AccountDto> = lecturers.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(AccountsListResponse { items, total }))
}

pub async fn reports_admin(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<ReportsResponse>, Problem> {
    let counts = state
        .reports
        .students_by_department(&ctx)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(counts.into()))
}

pub async fn export_report(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Path(report): Path<String>,
) -> Result<Response, Problem> {
    let kind = ReportKind::parse(&report).ok_or_else(|| {
        Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
            .with_detail(format!("unknown report: {}", report))
    })?;
    let export = state
        .reports
        .export(&ctx, kind)
        .await
        .map_err(map_domain_error)?;

    Response::builder()
        .header(header::CONTENT_TYPE, "text/csv")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        )
        .body(Body::from(export.content))
        .map_err(|_| Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"))
}

// ===== Courses =====

#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    /// Filter by department
    pub department: Option<String>,
}

pub async fn list_courses(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(_ctx): AuthUser,
    Query(query): Query<ListCoursesQuery>,
) -> Result<Json<CoursesListResponse>, Problem> {
    let courses = state
        .courses
        .list_courses(query.department.as_deref())
        .await
        .map_err(map_domain_error)?;
    let items: Vec<CourseDto> = courses.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(CoursesListResponse { items, total }))
}

pub async fn create_course(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseDto>), Problem> {
    let course = state
        .courses
        .create_course(
            &ctx,
            req.title,
            req.description,
            req.department,
            req.lecturer_user_id,
        )
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

pub async fn lecturer_courses(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<CoursesListResponse>, Problem> {
    let courses = state
        .courses
        .lecturer_courses(&ctx)
        .await
        .map_err(map_domain_error)?;
    let items: Vec<CourseDto> = courses.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(CoursesListResponse { items, total }))
}

pub async fn course_detail(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(_ctx): AuthUser,
    Path(course_id): Path<i64>,
) -> Result<Json<CourseDetailResponse>, Problem> {
    let detail = state
        .courses
        .course_detail(course_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(detail.into()))
}

/// Multipart upload of a course material (fields: `title`, `file`)
pub async fn upload_material(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Path(course_id): Path<i64>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MaterialDto>), Problem> {
    let upload = read_upload(multipart).await?;
    let file = upload.file.ok_or_else(|| {
        Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
            .with_detail("missing file field")
    })?;
    let title = upload.title.unwrap_or_else(|| file.0.clone());

    let path = state
        .media
        .save(MediaKind::Materials, &file.0, &file.1)
        .await
        .map_err(media_problem)?;

    let material = state
        .courses
        .add_material(&ctx, course_id, title, path)
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(material.into())))
}

// ===== Assignments =====

pub async fn create_assignment(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentDto>), Problem> {
    let assignment = state
        .courses
        .create_assignment(&ctx, req.course_id, req.title, req.description, req.due_date)
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(assignment.into())))
}

pub async fn student_assignments(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<AssignmentsListResponse>, Problem> {
    let assignments = state
        .courses
        .student_assignments(&ctx)
        .await
        .map_err(map_domain_error)?;
    let items: Vec<AssignmentDto> = assignments.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(AssignmentsListResponse { items, total }))
}

pub async fn assignment_detail(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(_ctx): AuthUser,
    Path(assignment_id): Path<i64>,
) -> Result<Json<AssignmentDetailResponse>, Problem> {
    let detail = state
        .courses
        .assignment_detail(assignment_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(detail.into()))
}

/// Multipart submission of an assignment (field: `file`)
pub async fn submit_assignment(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Path(assignment_id): Path<i64>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionDto>), Problem> {
    let upload = read_upload(multipart).await?;
    let file = upload.file.ok_or_else(|| {
        Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
            .with_detail("please upload a file before submitting")
    })?;

    let path = state
        .media
        .save(MediaKind::Submissions, &file.0, &file.1)
        .await
        .map_err(media_problem)?;

    let submission = state
        .courses
        .submit_assignment(&ctx, assignment_id, path)
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(submission.into())))
}

// ===== Results =====

pub async fn lecturer_results(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<ResultsListResponse>, Problem> {
    let results = state
        .courses
        .lecturer_results(&ctx)
        .await
        .map_err(map_domain_error)?;
    let items: Vec<ResultDto> = results.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(ResultsListResponse { items, total }))
}

pub async fn record_result(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Json(req): Json<RecordResultRequest>,
) -> Result<(StatusCode, Json<ResultDto>), Problem> {
    let result = state
        .courses
        .record_result(&ctx, req.student_user_id, req.course_id, req.score, req.grade)
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

// ===== Chat =====

pub async fn chat_contacts(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<AccountsListResponse>, Problem> {
    let contacts = state
        .chat
        .contacts(&ctx)
        .await
        .map_err(map_domain_error)?;
    let items: Vec<AccountDto> = contacts.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(AccountsListResponse { items, total }))
}

pub async fn chat_history(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<MessagesListResponse>, Problem> {
    let messages = state
        .chat
        .history(&ctx, user_id)
        .await
        .map_err(map_domain_error)?;
    let items: Vec<MessageDto> = messages.into_iter().map(Into::into).collect();
    let total = items.len();
    Ok(Json(MessagesListResponse { items, total }))
}

// ===== Helpers =====

fn parse_role(role: &str) -> Result<Role, Problem> {
    Role::parse(role).ok_or_else(|| {
        Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
            .with_detail(format!("unknown role: {}", role))
    })
}

fn media_problem(err: crate::infra::media::MediaError) -> Problem {
    tracing::error!(error = %err, "media store failure");
    Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        .with_detail("failed to store uploaded file")
}

struct Upload {
    title: Option<String>,
    file: Option<(String, Vec<u8>)>,
}

/// Drain a multipart body into its `title` and `file` fields
async fn read_upload(mut multipart: Multipart) -> Result<Upload, Problem> {
    let mut upload = Upload {
        title: None,
        file: None,
    };
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
            .with_detail(format!("malformed multipart body: {}", err))
    })? {
        match field.name() {
            Some("title") => {
                let text = field.text().await.map_err(|err| {
                    Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
                        .with_detail(format!("malformed title field: {}", err))
                })?;
                upload.title = Some(text);
            }
            Some("file") => {
                let name = field
                    .file_name()
                    .unwrap_or("upload.bin")
                    .to_string();
                let bytes = field.bytes().await.map_err(|err| {
                    Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
                        .with_detail(format!("malformed file field: {}", err))
                })?;
                upload.file = Some((name, bytes.to_vec()));
            }
            _ => {}
        }
    }
    Ok(upload)
}
