//! Owner-configured status hiding.
//!
//! Matching is by exact (case-sensitive) status display name. Renaming a
//! workflow state in the tracker therefore silently un-hides its items until
//! the owner updates the view.

use crate::{ExternalItem, StatusSet};

/// Removes every item whose status name is in `hidden`.
///
/// Survivors keep their relative order. An empty set returns the input as is.
pub fn apply(items: Vec<ExternalItem>, hidden: &StatusSet) -> Vec<ExternalItem> {
    if hidden.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| !hidden.contains(&item.status.name))
        .collect()
}
