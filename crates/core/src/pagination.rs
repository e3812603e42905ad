//! Pagination and ordering helpers shared by the repository and API layers.
//!
//! Every listing endpoint returns a [`Listing`] envelope and accepts the
//! same [`PageParams`] query parameters. Ordering goes through
//! [`build_order_clause`] with a per-resource whitelist so user input never
//! reaches SQL unchecked.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Hard ceiling on page size. Listing endpoints never return more rows, and
/// a missing `limit` defaults to this value (clients that want everything
/// get everything, up to the ceiling).
pub const MAX_PAGE_SIZE: i64 = 10_000;

/// One page of results plus the total number of matching rows.
///
/// `count` is the cardinality of the filtered set *before* `limit`/`offset`
/// slicing, so clients can page without a separate count request.
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub count: i64,
}

/// Query parameters accepted by every listing endpoint
/// (`?limit=20&offset=40&order_by=-created_at,name`).
///
/// `order_by` is a comma-separated list of field names, each optionally
/// prefixed with `-` for descending order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Option<String>,
}

impl PageParams {
    /// Effective limit, clamped to `0..=MAX_PAGE_SIZE`.
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, MAX_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    /// Effective offset, clamped to non-negative.
    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Clamp a user-provided limit to `0..=max`, falling back to `default`.
///
/// A limit of zero is valid: it returns an empty page while still reporting
/// the total count.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(0).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build a SQL `ORDER BY` clause from a comma-separated `order_by` value.
///
/// `allowed` maps wire-facing field names to qualified column expressions
/// (e.g. `("created_at", "c.created_at")`); anything not in the whitelist is
/// a validation error, never SQL. `default` is the full clause body used
/// when no ordering was requested.
pub fn build_order_clause(
    raw: Option<&str>,
    allowed: &[(&str, &str)],
    default: &str,
) -> Result<String, CoreError> {
    let Some(raw) = raw else {
        return Ok(format!("ORDER BY {default}"));
    };

    let mut terms = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (field, direction) = match entry.strip_prefix('-') {
            Some(field) => (field, "DESC"),
            None => (entry, "ASC"),
        };
        let column = allowed
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| CoreError::Validation(format!("Cannot order by field '{field}'")))?;
        terms.push(format!("{column} {direction}"));
    }

    if terms.is_empty() {
        return Ok(format!("ORDER BY {default}"));
    }
    Ok(format!("ORDER BY {}", terms.join(", ")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
