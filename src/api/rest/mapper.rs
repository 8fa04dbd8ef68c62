//! Mapper implementations for converting contract models into REST DTOs

use super::dto::*;
use crate::contract;
use crate::domain::courses::{AssignmentDetail, CourseDetail, Dashboard};
use crate::infra::media::MediaStore;

impl From<contract::Account> for AccountDto {
    fn from(account: contract::Account) -> Self {
        Self {
            user_id: account.user.id,
            username: account.user.username,
            email: account.user.email,
            role: account.profile.role.as_str().to_string(),
            lecturer_id: account.profile.lecturer_id,
            department: account.profile.department,
            is_approved: account.profile.is_approved,
            profile_image: account
                .profile
                .profile_image
                .as_deref()
                .map(MediaStore::url),
            created_at: account.user.created_at,
        }
    }
}

impl From<contract::Course> for CourseDto {
    fn from(course: contract::Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            department: course.department,
            lecturer_id: course.lecturer_id,
            created_at: course.created_at,
        }
    }
}

impl From<contract::CourseMaterial> for MaterialDto {
    fn from(material: contract::CourseMaterial) -> Self {
        Self {
            id: material.id,
            course_id: material.course_id,
            title: material.title,
            file: MediaStore::url(&material.file_path),
            uploaded_at: material.uploaded_at,
        }
    }
}

impl From<contract::Assignment> for AssignmentDto {
    fn from(assignment: contract::Assignment) -> Self {
        Self {
            id: assignment.id,
            title: assignment.title,
            description: assignment.description,
            lecturer_id: assignment.lecturer_id,
            course_id: assignment.course_id,
            created_at: assignment.created_at,
            due_date: assignment.due_date,
        }
    }
}

impl From<contract::Submission> for SubmissionDto {
    fn from(submission: contract::Submission) -> Self {
        Self {
            id: submission.id,
            assignment_id: submission.assignment_id,
            student_id: submission.student_id,
            file: MediaStore::url(&submission.file_path),
            feedback: submission.feedback,
            created_at: submission.created_at,
        }
    }
}

impl From<contract::CourseResult> for ResultDto {
    fn from(result: contract::CourseResult) -> Self {
        Self {
            id: result.id,
            student_id: result.student_id,
            course_id: result.course_id,
            score: result.score,
            grade: result.grade,
        }
    }
}

impl From<contract::Message> for MessageDto {
    fn from(message: contract::Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            message: message.body,
            voice_note: message.audio_path.as_deref().map(MediaStore::url),
            file: message.attachment_path.as_deref().map(MediaStore::url),
            client_id: message.client_id,
            status: message.status.as_str().to_string(),
            timestamp: message.created_at,
        }
    }
}

impl From<CourseDetail> for CourseDetailResponse {
    fn from(detail: CourseDetail) -> Self {
        Self {
            course: detail.course.into(),
            materials: detail.materials.into_iter().map(Into::into).collect(),
            assignments: detail.assignments.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<AssignmentDetail> for AssignmentDetailResponse {
    fn from(detail: AssignmentDetail) -> Self {
        Self {
            assignment: detail.assignment.into(),
            submissions: detail.submissions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Dashboard> for DashboardDto {
    fn from(dashboard: Dashboard) -> Self {
        match dashboard {
            Dashboard::Admin {
                pending_students,
                lecturers,
                total_students,
                total_lecturers,
                total_courses,
                total_assignments,
            } => Self::Admin {
                pending_students: pending_students.into_iter().map(Into::into).collect(),
                lecturers: lecturers.into_iter().map(Into::into).collect(),
                total_students,
                total_lecturers,
                total_courses,
                total_assignments,
            },
            Dashboard::Lecturer {
                courses,
                pending_assignments,
                students_count,
            } => Self::Lecturer {
                courses: courses.into_iter().map(Into::into).collect(),
                pending_assignments: pending_assignments.into_iter().map(Into::into).collect(),
                students_count,
            },
            Dashboard::Student {
                courses,
                assignments,
            } => Self::Student {
                courses: courses.into_iter().map(Into::into).collect(),
                assignments: assignments.into_iter().map(Into::into).collect(),
            },
        }
    }
}

impl From<Vec<contract::DepartmentCount>> for ReportsResponse {
    fn from(counts: Vec<contract::DepartmentCount>) -> Self {
        let mut labels = Vec::with_capacity(counts.len());
        let mut data = Vec::with_capacity(counts.len());
        for count in counts {
            labels.push(count.department);
            data.push(count.count);
        }
        Self { labels, data }
    }
}
