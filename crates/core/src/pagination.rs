//! Limit/offset clamping shared by every paginated listing.

/// Default page size when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
