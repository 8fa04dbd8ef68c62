//! Course, assignment, submission and result management

use crate::contract::{
    Account, Assignment, AuthContext, Course, CourseMaterial, CourseResult, NewAssignment,
    NewCourse, PortalError, Profile, Role, Submission,
};
use crate::domain::repository::{
    AccountRepository, AssignmentRepository, CourseRepository, ResultRepository,
};
use crate::domain::validation;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Course with its materials and assignments
#[derive(Debug, Clone)]
pub struct CourseDetail {
    pub course: Course,
    pub materials: Vec<CourseMaterial>,
    pub assignments: Vec<Assignment>,
}

/// Assignment with its submissions
#[derive(Debug, Clone)]
pub struct AssignmentDetail {
    pub assignment: Assignment,
    pub submissions: Vec<Submission>,
}

/// Role-shaped dashboard context
#[derive(Debug, Clone)]
pub enum Dashboard {
    Admin {
        pending_students: Vec<Account>,
        lecturers: Vec<Account>,
        total_students: u64,
        total_lecturers: u64,
        total_courses: u64,
        total_assignments: u64,
    },
    Lecturer {
        courses: Vec<Course>,
        pending_assignments: Vec<Assignment>,
        students_count: u64,
    },
    Student {
        courses: Vec<Course>,
        assignments: Vec<Assignment>,
    },
}

/// Course and assignment service
pub struct CourseService {
    accounts: Arc<dyn AccountRepository>,
    courses: Arc<dyn CourseRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    results: Arc<dyn ResultRepository>,
}

impl CourseService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        courses: Arc<dyn CourseRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            accounts,
            courses,
            assignments,
            results,
        }
    }

    async fn profile(&self, user_id: i64) -> Result<Profile, PortalError> {
        self.accounts
            .find_profile_by_user(user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("profile", user_id))
    }

    // ===== Dashboards =====

    /// Role-shaped dashboard for the caller
    pub async fn dashboard(&self, ctx: &AuthContext) -> Result<Dashboard, PortalError> {
        let profile = self.profile(ctx.user_id).await?;
        match profile.role {
            Role::Admin => {
                let pending_students = self
                    .accounts
                    .list_pending_students()
                    .await
                    .map_err(internal)?;
                let lecturers = self
                    .accounts
                    .list_by_role(Role::Lecturer)
                    .await
                    .map_err(internal)?;
                let total_lecturers = lecturers.len() as u64;
                Ok(Dashboard::Admin {
                    pending_students,
                    lecturers,
                    total_students: self
                        .accounts
                        .count_by_role(Role::Student)
                        .await
                        .map_err(internal)?,
                    total_lecturers,
                    total_courses: self.courses.count().await.map_err(internal)?,
                    total_assignments: self.assignments.count().await.map_err(internal)?,
                })
            }
            Role::Lecturer => {
                let courses = self
                    .courses
                    .list_by_lecturer(profile.id)
                    .await
                    .map_err(internal)?;
                let mut pending_assignments = Vec::new();
                for course in &courses {
                    pending_assignments.extend(
                        self.assignments
                            .list_by_course(course.id)
                            .await
                            .map_err(internal)?,
                    );
                }
                let students_count = match profile.department.as_deref() {
                    Some(department) => self
                        .accounts
                        .count_students_in_department(department)
                        .await
                        .map_err(internal)?,
                    None => 0,
                };
                Ok(Dashboard::Lecturer {
                    courses,
                    pending_assignments,
                    students_count,
                })
            }
            Role::Student => {
                if !profile.is_approved {
                    return Err(PortalError::NotApproved);
                }
                let department = profile.department.as_deref().unwrap_or_default();
                Ok(Dashboard::Student {
                    courses: self
                        .courses
                        .list_by_department(department)
                        .await
                        .map_err(internal)?,
                    assignments: self
                        .assignments
                        .list_by_department(department)
                        .await
                        .map_err(internal)?,
                })
            }
        }
    }

    // ===== Courses =====

    /// Create a course (admin, or a lecturer for themselves)
    pub async fn create_course(
        &self,
        ctx: &AuthContext,
        title: String,
        description: String,
        department: String,
        lecturer_user_id: Option<i64>,
    ) -> Result<Course, PortalError> {
        validation::validate_department(&department)?;
        if title.trim().is_empty() {
            return Err(PortalError::validation("course title cannot be empty"));
        }

        let lecturer_id = match ctx.role {
            Role::Admin => match lecturer_user_id {
                Some(user_id) => {
                    let profile = self.profile(user_id).await?;
                    if profile.role != Role::Lecturer {
                        return Err(PortalError::validation(
                            "course lecturer must have the lecturer role",
                        ));
                    }
                    Some(profile.id)
                }
                None => None,
            },
            Role::Lecturer => Some(self.profile(ctx.user_id).await?.id),
            Role::Student => {
                return Err(PortalError::forbidden("students cannot create courses"))
            }
        };

        self.courses
            .create(NewCourse {
                title,
                description,
                department,
                lecturer_id,
            })
            .await
            .map_err(internal)
    }

    pub async fn list_courses(
        &self,
        department: Option<&str>,
    ) -> Result<Vec<Course>, PortalError> {
        match department {
            Some(department) => self
                .courses
                .list_by_department(department)
                .await
                .map_err(internal),
            None => self.courses.list_all().await.map_err(internal),
        }
    }

    /// Courses taught by the calling lecturer
    pub async fn lecturer_courses(&self, ctx: &AuthContext) -> Result<Vec<Course>, PortalError> {
        let profile = self.profile(ctx.user_id).await?;
        if profile.role != Role::Lecturer {
            return Err(PortalError::forbidden("lecturer role required"));
        }
        self.courses
            .list_by_lecturer(profile.id)
            .await
            .map_err(internal)
    }

    pub async fn course_detail(&self, course_id: i64) -> Result<CourseDetail, PortalError> {
        let course = self
            .courses
            .find(course_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("course", course_id))?;
        let materials = self
            .courses
            .materials_for(course_id)
            .await
            .map_err(internal)?;
        let assignments = self
            .assignments
            .list_by_course(course_id)
            .await
            .map_err(internal)?;
        Ok(CourseDetail {
            course,
            materials,
            assignments,
        })
    }

    /// Attach an uploaded material to a course (lecturer action)
    pub async fn add_material(
        &self,
        ctx: &AuthContext,
        course_id: i64,
        title: String,
        file_path: String,
    ) -> Result<CourseMaterial, PortalError> {
        if !ctx.is_lecturer() {
            return Err(PortalError::forbidden("lecturer role required"));
        }
        if title.trim().is_empty() {
            return Err(PortalError::validation("material title cannot be empty"));
        }
        self.courses
            .find(course_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("course", course_id))?;
        self.courses
            .add_material(course_id, &title, &file_path)
            .await
            .map_err(internal)
    }

    // ===== Assignments =====

    /// Create an assignment on a course (lecturer action)
    pub async fn create_assignment(
        &self,
        ctx: &AuthContext,
        course_id: Option<i64>,
        title: String,
        description: String,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Assignment, PortalError> {
        let profile = self.profile(ctx.user_id).await?;
        if profile.role != Role::Lecturer {
            return Err(PortalError::forbidden("lecturer role required"));
        }
        if title.trim().is_empty() {
            return Err(PortalError::validation("assignment title cannot be empty"));
        }
        if let Some(course_id) = course_id {
            self.courses
                .find(course_id)
                .await
                .map_err(internal)?
                .ok_or_else(|| PortalError::not_found("course", course_id))?;
        }
        self.assignments
            .create(NewAssignment {
                title,
                description,
                lecturer_id: Some(profile.id),
                course_id,
                due_date,
            })
            .await
            .map_err(internal)
    }

    /// Assignments for the calling student's department
    pub async fn student_assignments(
        &self,
        ctx: &AuthContext,
    ) -> Result<Vec<Assignment>, PortalError> {
        let profile = self.profile(ctx.user_id).await?;
        if profile.role != Role::Student {
            return Err(PortalError::forbidden("student role required"));
        }
        let department = profile.department.as_deref().unwrap_or_default();
        self.assignments
            .list_by_department(department)
            .await
            .map_err(internal)
    }

    pub async fn assignment_detail(
        &self,
        assignment_id: i64,
    ) -> Result<AssignmentDetail, PortalError> {
        let assignment = self
            .assignments
            .find(assignment_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("assignment", assignment_id))?;
        let submissions = self
            .assignments
            .submissions_for(assignment_id)
            .await
            .map_err(internal)?;
        Ok(AssignmentDetail {
            assignment,
            submissions,
        })
    }

    /// Submit a stored file for an assignment (student action)
    pub async fn submit_assignment(
        &self,
        ctx: &AuthContext,
        assignment_id: i64,
        file_path: String,
    ) -> Result<Submission, PortalError> {
        let profile = self.profile(ctx.user_id).await?;
        if profile.role != Role::Student {
            return Err(PortalError::forbidden("student role required"));
        }
        self.assignments
            .find(assignment_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("assignment", assignment_id))?;
        self.assignments
            .add_submission(assignment_id, profile.id, &file_path)
            .await
            .map_err(internal)
    }

    // ===== Results =====

    /// Record a result for a student on one of the caller's courses
    pub async fn record_result(
        &self,
        ctx: &AuthContext,
        student_user_id: i64,
        course_id: i64,
        score: Decimal,
        grade: Option<String>,
    ) -> Result<CourseResult, PortalError> {
        let lecturer = self.profile(ctx.user_id).await?;
        if lecturer.role != Role::Lecturer {
            return Err(PortalError::forbidden("lecturer role required"));
        }
        let course = self
            .courses
            .find(course_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("course", course_id))?;
        if course.lecturer_id != Some(lecturer.id) {
            return Err(PortalError::forbidden(
                "results can only be recorded on your own courses",
            ));
        }
        let student = self.profile(student_user_id).await?;
        if student.role != Role::Student {
            return Err(PortalError::validation("results belong to students"));
        }
        self.results
            .record(student.id, course_id, score, grade.as_deref())
            .await
            .map_err(internal)
    }

    /// Results across all courses taught by the calling lecturer
    pub async fn lecturer_results(
        &self,
        ctx: &AuthContext,
    ) -> Result<Vec<CourseResult>, PortalError> {
        let profile = self.profile(ctx.user_id).await?;
        if profile.role != Role::Lecturer {
            return Err(PortalError::forbidden("lecturer role required"));
        }
        let courses = self
            .courses
            .list_by_lecturer(profile.id)
            .await
            .map_err(internal)?;
        let course_ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
        self.results
            .list_for_courses(&course_ids)
            .await
            .map_err(internal)
    }
}

fn internal(err: anyhow::Error) -> PortalError {
    tracing::error!(error = %err, "repository failure");
    PortalError::Internal
}
