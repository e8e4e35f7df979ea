//! Validation for the catalog: categories, genres and titles.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

use crate::error::CoreError;

/// Maximum length of category, genre and title names.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum slug length.
pub const MAX_SLUG_LENGTH: usize = 50;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

/// Validate a display name (category, genre or title).
pub fn validate_name(entity: &str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "{entity} name must not be empty"
        )));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{entity} name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a category or genre slug.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Slug exceeds maximum length of {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Only latin letters, digits, '-' and '_' are allowed"
        )));
    }
    Ok(())
}

/// Validate a release year against the given current year.
pub fn validate_year_against(year: i32, current_year: i32) -> Result<(), CoreError> {
    if year < 0 {
        return Err(CoreError::Validation(
            "Year must be a non-negative number".into(),
        ));
    }
    if year > current_year {
        return Err(CoreError::Validation(format!(
            "Year {year} is in the future (current year is {current_year})"
        )));
    }
    Ok(())
}

/// Validate a release year: not negative and not after the current UTC year.
pub fn validate_year(year: i32) -> Result<(), CoreError> {
    validate_year_against(year, chrono::Utc::now().year())
}

/// Validate the genre slug list of a title and drop duplicates, keeping order.
pub fn normalize_genre_slugs(slugs: &[String]) -> Result<Vec<String>, CoreError> {
    if slugs.is_empty() {
        return Err(CoreError::Validation(
            "A title must have at least one genre".into(),
        ));
    }
    let mut unique: Vec<String> = Vec::with_capacity(slugs.len());
    for slug in slugs {
        validate_slug(slug)?;
        if !unique.contains(slug) {
            unique.push(slug.clone());
        }
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(validate_slug("sci-fi").is_ok());
        assert!(validate_slug("rock_n_roll_2").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("with space").is_err());
        assert!(validate_slug("драма").is_err());
        assert!(validate_slug(&"s".repeat(MAX_SLUG_LENGTH + 1)).is_err());
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("Genre", "Drama").is_ok());
        assert!(validate_name("Genre", "   ").is_err());
        let err = validate_name("Title", &"n".repeat(MAX_NAME_LENGTH + 1)).unwrap_err();
        assert!(err.to_string().contains("Title name"));
    }

    #[test]
    fn year_bounds() {
        assert!(validate_year_against(1895, 2026).is_ok());
        assert!(validate_year_against(0, 2026).is_ok());
        assert!(validate_year_against(2026, 2026).is_ok());
        assert!(validate_year_against(2027, 2026).is_err());
        assert!(validate_year_against(-1, 2026).is_err());
    }

    #[test]
    fn current_year_is_accepted_and_next_is_not() {
        let now = chrono::Utc::now().year();
        assert!(validate_year(now).is_ok());
        assert!(validate_year(now + 1).is_err());
    }

    #[test]
    fn genre_slugs_deduplicated_in_order() {
        let slugs = vec!["drama".to_string(), "comedy".to_string(), "drama".to_string()];
        assert_eq!(normalize_genre_slugs(&slugs).unwrap(), vec!["drama", "comedy"]);
    }

    #[test]
    fn empty_or_invalid_genre_list_rejected() {
        assert!(normalize_genre_slugs(&[]).is_err());
        assert!(normalize_genre_slugs(&["bad slug".to_string()]).is_err());
    }
}
