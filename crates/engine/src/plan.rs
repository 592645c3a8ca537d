//! Query planning: request normalization and defaults
//!
//! The planner turns a raw [`QueryRequest`] into an executable
//! [`QueryPlan`]: defaults filled, paging bounds-checked, the sort
//! direction resolved, and the soft-delete guard pinned into the
//! filter. Planning is pure; all store access happens in the executor.
//!
//! ## Soft-delete guard
//!
//! The plan filter always carries `isDeleted = false`. A caller-
//! supplied `isDeleted` entry is overwritten, so deleted records are
//! unreachable through queries no matter what the request asks for.

use roster_core::{keys, Filter, QueryRequest, RosterError, RosterResult, SortOrder};
use serde_json::Value;

/// Page number used when the request leaves it unset
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when the request leaves it unset
pub const DEFAULT_LIMIT: u64 = 20;

/// Sort field used when the request leaves it unset or blank
pub const DEFAULT_SORT_BY: &str = "createdAt";

/// Planner policy knobs
///
/// Deployment-level limits applied during planning. The zero-config
/// default imposes no ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// Upper bound for the requested page size; `None` is unbounded
    pub max_limit: Option<u64>,
}

/// Normalized, executable form of a list query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// Match filter, soft-delete guard included
    pub filter: Filter,
    /// Records to pass over before the page window starts
    pub skip: u64,
    /// Page window size
    pub limit: u64,
    /// Field the window is ordered by
    pub sort_by: String,
    /// Sort direction
    pub order: SortOrder,
    /// Effective 1-based page number, echoed into the result envelope
    pub page: u64,
}

/// Build an executable plan from a raw request
///
/// # Errors
/// `Validation` when `page` or `limit` is below 1, when `limit`
/// exceeds the configured ceiling, or when `sort` is neither 1 nor -1.
pub fn build(request: &QueryRequest, options: &PlanOptions) -> RosterResult<QueryPlan> {
    let page = positive("page", request.page, DEFAULT_PAGE)?;
    let limit = positive("limit", request.limit, DEFAULT_LIMIT)?;
    if let Some(max) = options.max_limit {
        if limit > max {
            return Err(RosterError::validation(format!(
                "limit must not exceed {}, got {}",
                max, limit
            )));
        }
    }

    let order = match request.sort {
        None => SortOrder::default(),
        Some(raw) => SortOrder::from_value(raw).ok_or_else(|| {
            RosterError::validation(format!("sort must be 1 or -1, got {}", raw))
        })?,
    };
    let sort_by = match request.sort_by.as_deref() {
        None | Some("") => DEFAULT_SORT_BY.to_string(),
        Some(field) => field.to_string(),
    };

    let skip = (page - 1).checked_mul(limit).ok_or_else(|| {
        RosterError::validation(format!(
            "page and limit combination is out of range: page {}, limit {}",
            page, limit
        ))
    })?;

    let mut filter = request.filters.clone();
    filter.insert(keys::IS_DELETED.to_string(), Value::Bool(false));

    Ok(QueryPlan {
        filter,
        skip,
        limit,
        sort_by,
        order,
        page,
    })
}

fn positive(field: &str, value: Option<i64>, default: u64) -> RosterResult<u64> {
    match value {
        None => Ok(default),
        Some(v) if v >= 1 => Ok(v as u64),
        Some(v) => Err(RosterError::validation(format!(
            "{} must be a positive integer, got {}",
            field, v
        ))),
    }
}
