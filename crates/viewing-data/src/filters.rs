//! Profile → content type → title filtering and the choice lists built from it.

use std::collections::BTreeSet;

use tracing::warn;
use viewing_core::error::{Result, ViewingError};
use viewing_core::models::ViewingRecord;
use viewing_core::selection::{Selection, ALL_PROFILES, ALL_TITLES};

/// Rows matching every selector, in input order.
pub fn apply_selection(records: &[ViewingRecord], selection: &Selection) -> Vec<ViewingRecord> {
    let filtered: Vec<ViewingRecord> = records
        .iter()
        .filter(|r| selection.profile.matches(&r.profile_name))
        .filter(|r| selection.content_type.matches(r.content_type))
        .filter(|r| selection.title.matches(r.name.as_deref()))
        .cloned()
        .collect();
    if filtered.is_empty() && !records.is_empty() {
        warn!("No records left after filtering by {}", selection.describe());
    }
    filtered
}

/// Like [`apply_selection`] but reports an empty result as an error.
pub fn apply_selection_strict(
    records: &[ViewingRecord],
    selection: &Selection,
) -> Result<Vec<ViewingRecord>> {
    let filtered = apply_selection(records, selection);
    if filtered.is_empty() {
        return Err(ViewingError::EmptyResult(selection.describe()));
    }
    Ok(filtered)
}

/// `"All Profiles"` followed by every profile name, sorted.
pub fn profile_choices(records: &[ViewingRecord]) -> Vec<String> {
    let names: BTreeSet<&str> = records.iter().map(|r| r.profile_name.as_str()).collect();
    std::iter::once(ALL_PROFILES)
        .chain(names)
        .map(str::to_string)
        .collect()
}

/// `"All Titles"` followed by every named title left after the profile and
/// content type filters, sorted.
pub fn title_choices(records: &[ViewingRecord], selection: &Selection) -> Vec<String> {
    let names: BTreeSet<&str> = records
        .iter()
        .filter(|r| selection.profile.matches(&r.profile_name))
        .filter(|r| selection.content_type.matches(r.content_type))
        .filter_map(|r| r.name.as_deref())
        .collect();
    std::iter::once(ALL_TITLES)
        .chain(names)
        .map(str::to_string)
        .collect()
}
