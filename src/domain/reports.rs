//! Administrative reporting and CSV export

use crate::contract::{AuthContext, DepartmentCount, PortalError};
use crate::domain::repository::{AccountRepository, CourseRepository};
use std::sync::Arc;

/// Named CSV report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Students,
    Courses,
}

impl ReportKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "students" => Some(Self::Students),
            "courses" => Some(Self::Courses),
            _ => None,
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            Self::Students => "students_report.csv",
            Self::Courses => "courses_report.csv",
        }
    }
}

/// Rendered CSV export
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: &'static str,
    pub content: Vec<u8>,
}

/// Reporting service (admin only)
pub struct ReportService {
    accounts: Arc<dyn AccountRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl ReportService {
    pub fn new(accounts: Arc<dyn AccountRepository>, courses: Arc<dyn CourseRepository>) -> Self {
        Self { accounts, courses }
    }

    /// Student head-counts per department, descending
    pub async fn students_by_department(
        &self,
        ctx: &AuthContext,
    ) -> Result<Vec<DepartmentCount>, PortalError> {
        require_admin(ctx)?;
        self.accounts
            .count_students_by_department()
            .await
            .map_err(internal)
    }

    /// Render a named report as a CSV attachment
    pub async fn export(
        &self,
        ctx: &AuthContext,
        kind: ReportKind,
    ) -> Result<CsvExport, PortalError> {
        require_admin(ctx)?;
        let content = match kind {
            ReportKind::Students => self.students_csv().await?,
            ReportKind::Courses => self.courses_csv().await?,
        };
        Ok(CsvExport {
            filename: kind.filename(),
            content,
        })
    }

    async fn students_csv(&self) -> Result<Vec<u8>, PortalError> {
        let students = self
            .accounts
            .list_by_role(crate::contract::Role::Student)
            .await
            .map_err(internal)?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["username", "email", "department", "is_approved"])
            .map_err(csv_internal)?;
        for account in students {
            writer
                .write_record([
                    account.user.username.as_str(),
                    account.user.email.as_str(),
                    account.profile.department.as_deref().unwrap_or_default(),
                    if account.profile.is_approved {
                        "true"
                    } else {
                        "false"
                    },
                ])
                .map_err(csv_internal)?;
        }
        writer.into_inner().map_err(|err| {
            tracing::error!(error = %err, "csv rendering failed");
            PortalError::Internal
        })
    }

    async fn courses_csv(&self) -> Result<Vec<u8>, PortalError> {
        let courses = self.courses.list_all().await.map_err(internal)?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["title", "description", "department", "created_at"])
            .map_err(csv_internal)?;
        for course in courses {
            writer
                .write_record([
                    course.title.as_str(),
                    course.description.as_str(),
                    course.department.as_str(),
                    course.created_at.to_rfc3339().as_str(),
                ])
                .map_err(csv_internal)?;
        }
        writer.into_inner().map_err(|err| {
            tracing::error!(error = %err, "csv rendering failed");
            PortalError::Internal
        })
    }
}

fn require_admin(ctx: &AuthContext) -> Result<(), PortalError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(PortalError::forbidden("administrator role required"))
    }
}

fn internal(err: anyhow::Error) -> PortalError {
    tracing::error!(error = %err, "repository failure");
    PortalError::Internal
}

fn csv_internal(err: csv::Error) -> PortalError {
    tracing::error!(error = %err, "csv rendering failed");
    PortalError::Internal
}
