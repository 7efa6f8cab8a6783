//! Zero-variance detection.

use std::collections::HashSet;

use crate::domain::models::frame::{Column, ColumnData, Frame};

fn distinct_text_levels(values: &[Option<String>]) -> usize {
    values
        .iter()
        .map(|v| v.as_deref().map(|s| s.trim().to_uppercase()))
        .collect::<HashSet<_>>()
        .len()
}

fn has_zero_variance(column: &Column) -> bool {
    let distinct = match column.data() {
        ColumnData::Text(values) => distinct_text_levels(values),
        _ => column.distinct_count(),
    };
    distinct < 2
}

/// Candidates holding fewer than two distinct values
///
/// Text values are compared case-insensitively after trimming. Returns an
/// empty list when `enabled` is false.
#[must_use]
pub fn find_zero_variance_features(frame: &Frame, candidates: &[String], enabled: bool) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    candidates
        .iter()
        .filter(|name| frame.column(name).is_some_and(has_zero_variance))
        .cloned()
        .collect()
}
