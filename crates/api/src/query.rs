//! Shared query parameter types for API handlers.

use marquee_core::pagination::{clamp_limit, clamp_offset, ilike_contains, MAX_PAGE_SIZE};
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp to `(limit, offset)` using the configured default page size.
    pub fn resolve(&self, default_page_size: i64) -> (i64, i64) {
        resolve_page(self.limit, self.offset, default_page_size)
    }
}

/// Pagination plus a free-text `?search=` term.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchParams {
    /// Clamp to `(limit, offset)` using the configured default page size.
    pub fn resolve(&self, default_page_size: i64) -> (i64, i64) {
        resolve_page(self.limit, self.offset, default_page_size)
    }

    /// `ILIKE` pattern for the search term; blank terms mean no filter.
    pub fn pattern(&self) -> Option<String> {
        search_pattern(self.search.as_deref())
    }
}

/// Clamp raw pagination values.
pub fn resolve_page(limit: Option<i64>, offset: Option<i64>, default_page_size: i64) -> (i64, i64) {
    (
        clamp_limit(limit, default_page_size, MAX_PAGE_SIZE),
        clamp_offset(offset),
    )
}

/// Convert an optional search term into a substring `ILIKE` pattern.
pub fn search_pattern(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ilike_contains)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_means_no_filter() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(Some(" noir ")), Some("%noir%".to_string()));
    }

    #[test]
    fn pagination_uses_configured_default() {
        let params = PaginationParams::default();
        assert_eq!(params.resolve(25), (25, 0));

        let params = PaginationParams {
            limit: Some(1000),
            offset: Some(-4),
        };
        assert_eq!(params.resolve(25), (MAX_PAGE_SIZE, 0));
    }
}
