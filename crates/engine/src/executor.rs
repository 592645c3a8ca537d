//! Query execution against a record store
//!
//! Runs a [`QueryPlan`] in fixed stages: fetch the matches in natural
//! order, strip internal metadata, cut the page window with skip and
//! limit, then order the window by the sort field.
//!
//! ## Window-then-sort
//!
//! Sorting is the LAST stage and applies to the already-cut window.
//! Page N is always the N-th slice of natural (insertion) order; the
//! sort field rearranges records inside that slice only, it never
//! selects which records belong to the page. The sort is stable, so
//! records that compare equal keep their natural order.

use std::cmp::Ordering;

use roster_core::{keys, Page, Record, RosterResult, SortOrder};
use roster_store::RecordStore;
use serde_json::Value;
use tracing::debug;

use crate::plan::QueryPlan;

/// Run a plan and materialize the result page
///
/// # Errors
/// Propagates store failures; `StoreUnavailable` when a stored
/// document no longer materializes into a record.
pub fn execute(store: &dyn RecordStore, plan: &QueryPlan) -> RosterResult<Page<Record>> {
    let matched = store.find_matching(&plan.filter)?;
    let matched_count = matched.len();

    let skip = usize::try_from(plan.skip).unwrap_or(usize::MAX);
    let limit = usize::try_from(plan.limit).unwrap_or(usize::MAX);
    let mut window: Vec<_> = matched
        .into_iter()
        .map(|mut doc| {
            doc.remove(keys::REVISION);
            doc
        })
        .skip(skip)
        .take(limit)
        .collect();

    window.sort_by(|a, b| {
        let ordering = compare_values(a.get(&plan.sort_by), b.get(&plan.sort_by));
        match plan.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });

    let mut data = Vec::with_capacity(window.len());
    for doc in window {
        data.push(Record::from_document(doc)?);
    }
    debug!(
        target: "roster::query",
        matched = matched_count,
        returned = data.len(),
        page = plan.page,
        "executed list query"
    );
    Ok(Page {
        data,
        page: plan.page,
        limit: plan.limit,
        sort: plan.order,
        sort_by: plan.sort_by.clone(),
    })
}

/// Cross-type ordering over document values
///
/// Values rank by type first (missing and null lowest, then bool,
/// number, string, array, object), then by value within rank.
/// Composite values compare equal within their rank, which under a
/// stable sort leaves them in natural order.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (rank_a, rank_b) = (type_rank(a), type_rank(b));
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => compare_numbers(x, y),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

fn compare_numbers(x: &serde_json::Number, y: &serde_json::Number) -> Ordering {
    let a = x.as_f64().unwrap_or(f64::NAN);
    let b = y.as_f64().unwrap_or(f64::NAN);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
