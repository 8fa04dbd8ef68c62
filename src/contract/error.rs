//! Contract error types for the campus portal
//!
//! These errors are transport-agnostic and shared across the domain services.

/// Portal domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// Record not found
    NotFound {
        /// Resource type (user, profile, course, assignment, ...)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Conflict (duplicate username, duplicate lecturer id, self-deletion, ...)
    Conflict {
        /// Conflict reason
        reason: String,
    },
    /// Input validation failure
    Validation {
        /// Validation error message
        message: String,
    },
    /// Missing or invalid credentials / token
    Unauthorized {
        /// What failed (invalid credentials, role mismatch, expired token, ...)
        reason: String,
    },
    /// Authenticated but not allowed to perform the operation
    Forbidden {
        /// What was attempted
        reason: String,
    },
    /// Account exists but has not been approved by an administrator
    NotApproved,
    /// Internal error
    Internal,
}

impl PortalError {
    pub fn not_found(resource: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for PortalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            Self::Conflict { reason } => {
                write!(f, "Conflict: {}", reason)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::Unauthorized { reason } => {
                write!(f, "Unauthorized: {}", reason)
            }
            Self::Forbidden { reason } => {
                write!(f, "Forbidden: {}", reason)
            }
            Self::NotApproved => {
                write!(f, "Account is awaiting administrator approval")
            }
            Self::Internal => {
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for PortalError {}
