//! Shared query parameter types for API handlers.

use harbor_core::types::Timestamp;
use serde::Deserialize;

/// A `?start=&end=` window (RFC 3339 timestamps).
#[derive(Debug, Deserialize)]
pub struct WindowParams {
    pub start: Timestamp,
    pub end: Timestamp,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Plain `?limit=&offset=` paging.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
