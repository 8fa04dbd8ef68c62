//! Input validation for registration and account management

use crate::contract::{PortalError, DEPARTMENTS};

/// Validate a username
///
/// Must be 3-150 characters of alphanumerics plus `_`, `.`, `-`, starting
/// with an alphanumeric.
pub fn validate_username(username: &str) -> Result<(), PortalError> {
    if username.len() < 3 || username.len() > 150 {
        return Err(PortalError::validation(
            "username must be between 3 and 150 characters",
        ));
    }

    let mut chars = username.chars();
    let first = chars.next().ok_or_else(|| {
        PortalError::validation("username cannot be empty")
    })?;
    if !first.is_ascii_alphanumeric() {
        return Err(PortalError::validation(
            "username must start with a letter or digit",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(PortalError::validation(
            "username may only contain letters, digits, '_', '.' and '-'",
        ));
    }
    Ok(())
}

/// Validate an email address
///
/// Deliberately shallow: one `@`, non-empty local part, domain with a dot.
pub fn validate_email(email: &str) -> Result<(), PortalError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(PortalError::validation("email must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(' ') {
        return Err(PortalError::validation("email address is not valid"));
    }
    Ok(())
}

/// Validate a raw password before hashing
pub fn validate_password(password: &str) -> Result<(), PortalError> {
    if password.len() < 8 {
        return Err(PortalError::validation(
            "password must be at least 8 characters",
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(PortalError::validation(
            "password cannot be entirely numeric",
        ));
    }
    Ok(())
}

/// Validate a department against the fixed department list
pub fn validate_department(department: &str) -> Result<(), PortalError> {
    if DEPARTMENTS.contains(&department) {
        Ok(())
    } else {
        Err(PortalError::validation(format!(
            "unknown department: {}",
            department
        )))
    }
}

/// Validate a lecturer staff identifier
pub fn validate_lecturer_id(lecturer_id: &str) -> Result<(), PortalError> {
    if lecturer_id.is_empty() || lecturer_id.len() > 20 {
        return Err(PortalError::validation(
            "lecturer id must be between 1 and 20 characters",
        ));
    }
    if !lecturer_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(PortalError::validation(
            "lecturer id may only contain letters, digits and '-'",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_usernames() {
        assert!(validate_username("ada").is_ok());
        assert!(validate_username("j.doe-42").is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("_leading").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn email_needs_domain_dot() {
        assert!(validate_email("a@b.edu").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("nope").is_err());
    }

    #[test]
    fn numeric_passwords_rejected() {
        assert!(validate_password("12345678").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password("correct horse").is_ok());
    }

    #[test]
    fn department_list_is_closed() {
        assert!(validate_department("Networking").is_ok());
        assert!(validate_department("Astrology").is_err());
    }
}
