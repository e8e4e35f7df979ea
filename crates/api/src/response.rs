//! Shared response envelope types for API handlers.
//!
//! List endpoints use [`PageResponse`]; single objects are returned bare.

use serde::Serialize;

/// Paginated list envelope:
/// `{ "data": [...], "total_count": N, "limit": L, "offset": O }`.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    /// Number of rows matching the filter, ignoring pagination.
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}
