//! Shared response envelope types for API handlers.
//!
//! Single objects use a `{ "data": ... }` envelope; list endpoints add the
//! total row count and the effective page window.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: report }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "count": N, "limit": L, "offset": O }` for paginated lists.
///
/// `count` is the total number of rows, not the length of `data`.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
}
