//! Authenticated caller context
//!
//! Built from a verified token at the API boundary and handed to domain
//! services so authorization checks stay transport-agnostic.

use super::model::Role;

/// Identity of the authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_lecturer(&self) -> bool {
        self.role == Role::Lecturer
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}
