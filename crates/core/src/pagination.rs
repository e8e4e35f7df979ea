//! Pagination defaults and clamping helpers shared by list endpoints.

/// Default page size when the client sends no `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build a `%term%` pattern for `ILIKE`, escaping the wildcard characters
/// so user input is matched literally.
pub fn ilike_contains(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
