//! Client-side search and ordering of the anomalies table.
//!
//! Pure functions only: the displayed list is derived from the full anomaly
//! set and the view state, and the input is never reordered in place.

use std::cmp::Ordering;

use crate::types::anomaly::Anomaly;
use crate::types::view::{SortColumn, SortOrder};

/// Case-insensitive substring match against title, reason code, reason
/// label, `"user <id>"`, the bare user id and the post id. `needle` must
/// already be lowercase.
fn matches_search(anomaly: &Anomaly, needle: &str) -> bool {
    let user_id = anomaly.user_id.to_string();
    anomaly.title.to_lowercase().contains(needle)
        || anomaly.reason.as_code().to_lowercase().contains(needle)
        || anomaly.reason.label().to_lowercase().contains(needle)
        || format!("user {}", user_id).contains(needle)
        || user_id.contains(needle)
        || anomaly.id.to_string().contains(needle)
}

fn compare(a: &Anomaly, b: &Anomaly, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::UserId => a.user_id.cmp(&b.user_id),
        SortColumn::Title => a.title.cmp(&b.title),
        SortColumn::Reason => a.reason.as_code().cmp(b.reason.as_code()),
    }
}

/// Filter by `search_term`, then stable-sort by one column. Equal keys keep
/// their input order in both directions.
pub fn filter_and_sort_anomalies(
    anomalies: &[Anomaly],
    search_term: &str,
    sort_by: SortColumn,
    sort_order: SortOrder,
) -> Vec<Anomaly> {
    let needle = search_term.to_lowercase();
    let mut filtered: Vec<Anomaly> = anomalies
        .iter()
        .filter(|a| needle.is_empty() || matches_search(a, &needle))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| match sort_order {
        SortOrder::Asc => compare(a, b, sort_by),
        SortOrder::Desc => compare(b, a, sort_by),
    });
    filtered
}
