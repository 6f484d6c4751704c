//! The form registry: which forms does a view offer, and in what order?
//!
//! A view stores the forms it offers as a list of ids in owner-chosen order.
//! That list may contain duplicates and ids of forms that have since been
//! deleted. Resolution walks the list once, keeps the first occurrence of each
//! id, drops ids with no matching form, and never re-sorts.
//!
//! The resolved list is both what visitors are offered and the authoritative
//! schema a submission is validated against.

use std::collections::{HashMap, HashSet};

use crate::{Form, FormId, FormSummary};

/// Result of resolving a view's enabled forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Forms in first-seen order, each at most once.
    pub forms: Vec<FormSummary>,
    /// Ids that referenced no existing form, in first-seen order, each at most
    /// once. Only surfaced on the owner-facing path.
    pub dropped: Vec<FormId>,
}

impl Resolution {
    /// Finds a resolved form by id.
    pub fn find(&self, id: &FormId) -> Option<&FormSummary> {
        self.forms.iter().find(|f| &f.id == id)
    }
}

/// Resolves `enabled` against `owner_forms` in O(n + m).
pub fn resolve(enabled: &[FormId], owner_forms: &[Form]) -> Resolution {
    let by_id: HashMap<&FormId, &Form> = owner_forms.iter().map(|f| (&f.id, f)).collect();
    let mut seen: HashSet<&FormId> = HashSet::with_capacity(enabled.len());
    let mut resolution = Resolution::default();

    for id in enabled {
        if !seen.insert(id) {
            continue;
        }
        match by_id.get(id) {
            Some(form) => resolution.forms.push(form.summary()),
            None => resolution.dropped.push(id.clone()),
        }
    }

    resolution
}
