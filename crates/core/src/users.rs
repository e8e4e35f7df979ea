//! Account field validation.
//!
//! Usernames follow the usual web-framework rules (Unicode word characters
//! plus `.@+-`, at most 150 chars) and `me` is reserved because
//! `/users/me` addresses the caller's own profile.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of first and last names.
pub const MAX_PERSON_NAME_LENGTH: usize = 150;

/// Username reserved for the self-profile route.
pub const RESERVED_USERNAME: &str = "me";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid regex"));

/// Validate a username for signup, admin creation and renames.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::Validation("Username must not be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Username exceeds maximum length of {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(CoreError::Validation(format!(
            "Invalid username '{username}'. Only letters, digits and @/./+/-/_ are allowed"
        )));
    }
    if username == RESERVED_USERNAME {
        return Err(CoreError::Validation(format!(
            "Username '{RESERVED_USERNAME}' is reserved"
        )));
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.is_empty() {
        return Err(CoreError::Validation("Email must not be empty".into()));
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(CoreError::Validation(format!(
            "Email exceeds maximum length of {MAX_EMAIL_LENGTH} characters"
        )));
    }
    // `ValidateEmail` accepts dotless hosts such as `localhost`.
    let domain_has_dot = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));
    if !email.validate_email() || !domain_has_dot {
        return Err(CoreError::Validation(format!(
            "Invalid email address '{email}'"
        )));
    }
    Ok(())
}

/// Validate an optional first/last name.
pub fn validate_person_name(field: &str, value: &str) -> Result<(), CoreError> {
    if value.chars().count() > MAX_PERSON_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_PERSON_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}
