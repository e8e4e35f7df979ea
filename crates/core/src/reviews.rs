//! Review and comment validation.

use crate::error::CoreError;

/// Lowest accepted review score.
pub const MIN_SCORE: i16 = 1;

/// Highest accepted review score.
pub const MAX_SCORE: i16 = 10;

/// Validate a review score.
pub fn validate_score(score: i16) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Validate review or comment text.
pub fn validate_text(kind: &str, text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(format!("{kind} text must not be empty")));
    }
    Ok(())
}
