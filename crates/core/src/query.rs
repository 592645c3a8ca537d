//! Query request and result envelope types
//!
//! A [`QueryRequest`] is the raw caller input: an open filter map plus
//! optional paging and ordering knobs, all untrusted. Normalizing it
//! into an executable plan (defaults, bounds checks, the soft-delete
//! guard) is the query planner's job, not this module's; these types
//! carry the input as given.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::SortOrder;

/// Equality filter over document fields: key, required value
///
/// A document matches when every entry is present in the document with
/// exactly the given value. An empty filter matches everything.
pub type Filter = BTreeMap<String, Value>;

/// Raw list-query input as supplied by a caller
///
/// All knobs are optional; the planner fills in defaults and rejects
/// out-of-range values. The filter map is open: unknown keys are legal
/// and simply match nothing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Field equality constraints
    #[serde(flatten)]
    pub filters: Filter,
    /// 1-based page number (default 1)
    #[serde(default)]
    pub page: Option<i64>,
    /// Page size (default 20)
    #[serde(default)]
    pub limit: Option<i64>,
    /// Sort direction, 1 ascending or -1 descending (default 1)
    #[serde(default)]
    pub sort: Option<i64>,
    /// Field to sort by (default "createdAt")
    #[serde(default)]
    pub sort_by: Option<String>,
}

/// One page of query results plus the paging parameters that shaped it
///
/// Echoes back the effective page, limit, and ordering so a caller can
/// see what defaults were applied. Deliberately carries no total count;
/// an empty `data` past the last page is a normal response, not an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page
    pub data: Vec<T>,
    /// Effective 1-based page number
    pub page: u64,
    /// Effective page size
    pub limit: u64,
    /// Effective sort direction
    pub sort: SortOrder,
    /// Effective sort field
    pub sort_by: String,
}
