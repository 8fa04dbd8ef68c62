//! Conversions between SeaORM entity models and contract models

use super::entity;
use crate::contract;

impl From<entity::Role> for contract::Role {
    fn from(role: entity::Role) -> Self {
        match role {
            entity::Role::Student => Self::Student,
            entity::Role::Lecturer => Self::Lecturer,
            entity::Role::Admin => Self::Admin,
        }
    }
}

impl From<contract::Role> for entity::Role {
    fn from(role: contract::Role) -> Self {
        match role {
            contract::Role::Student => Self::Student,
            contract::Role::Lecturer => Self::Lecturer,
            contract::Role::Admin => Self::Admin,
        }
    }
}

impl From<entity::MessageStatus> for contract::MessageStatus {
    fn from(status: entity::MessageStatus) -> Self {
        match status {
            entity::MessageStatus::Sent => Self::Sent,
            entity::MessageStatus::Delivered => Self::Delivered,
            entity::MessageStatus::Seen => Self::Seen,
        }
    }
}

impl From<contract::MessageStatus> for entity::MessageStatus {
    fn from(status: contract::MessageStatus) -> Self {
        match status {
            contract::MessageStatus::Sent => Self::Sent,
            contract::MessageStatus::Delivered => Self::Delivered,
            contract::MessageStatus::Seen => Self::Seen,
        }
    }
}

impl From<entity::user::Model> for contract::User {
    fn from(m: entity::user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            password_hash: m.password_hash,
            created_at: m.created_at,
        }
    }
}

impl From<entity::profile::Model> for contract::Profile {
    fn from(m: entity::profile::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            role: m.role.into(),
            lecturer_id: m.lecturer_id,
            department: m.department,
            is_approved: m.is_approved,
            profile_image: m.profile_image,
            created_at: m.created_at,
        }
    }
}

impl From<entity::course::Model> for contract::Course {
    fn from(m: entity::course::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            department: m.department,
            lecturer_id: m.lecturer_id,
            created_at: m.created_at,
        }
    }
}

impl From<entity::course_material::Model> for contract::CourseMaterial {
    fn from(m: entity::course_material::Model) -> Self {
        Self {
            id: m.id,
            course_id: m.course_id,
            title: m.title,
            file_path: m.file_path,
            uploaded_at: m.uploaded_at,
        }
    }
}

impl From<entity::assignment::Model> for contract::Assignment {
    fn from(m: entity::assignment::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            lecturer_id: m.lecturer_id,
            course_id: m.course_id,
            created_at: m.created_at,
            due_date: m.due_date,
        }
    }
}

impl From<entity::submission::Model> for contract::Submission {
    fn from(m: entity::submission::Model) -> Self {
        Self {
            id: m.id,
            assignment_id: m.assignment_id,
            student_id: m.student_id,
            file_path: m.file_path,
            feedback: m.feedback,
            created_at: m.created_at,
        }
    }
}

impl From<entity::message::Model> for contract::Message {
    fn from(m: entity::message::Model) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            recipient_id: m.recipient_id,
            body: m.body,
            audio_path: m.audio_path,
            attachment_path: m.attachment_path,
            client_id: m.client_id,
            status: m.status.into(),
            created_at: m.created_at,
        }
    }
}

impl From<entity::result::Model> for contract::CourseResult {
    fn from(m: entity::result::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            course_id: m.course_id,
            score: m.score,
            grade: m.grade,
        }
    }
}
