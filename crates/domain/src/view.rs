//! Published views.
//!
//! A [`View`] is an owner-configured, possibly gated projection of one tracker
//! scope. Views are created and edited through the owner's management screens;
//! the gateway only reads them.

use serde::{Deserialize, Serialize};

use crate::{FormId, OwnerId, PasswordHash, Scope, StatusSet, Timestamp, ViewId, ViewSlug};

/// Which item fields the public page renders.
///
/// Purely presentational; carried through to visitors unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub show_assignees: bool,
    pub show_labels: bool,
    pub show_priorities: bool,
    pub show_descriptions: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_assignees: true,
            show_labels: true,
            show_priorities: true,
            show_descriptions: true,
        }
    }
}

/// A published view record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub id: ViewId,
    pub slug: ViewSlug,
    pub owner: OwnerId,
    /// Owner-facing name in the management list.
    pub name: String,
    /// Heading shown to visitors.
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    #[serde(default)]
    pub password_protected: bool,
    /// Present iff `password_protected`. Anything else is a store-integrity fault.
    #[serde(default)]
    pub password_hash: Option<PasswordHash>,
    /// Items whose status name is in this set are never shown to visitors.
    #[serde(default)]
    pub hidden_statuses: StatusSet,
    /// Upstream status filter; empty means every status is fetched.
    #[serde(default)]
    pub allowed_statuses: StatusSet,
    #[serde(default)]
    pub allow_submission: bool,
    /// Forms offered to visitors, in owner-chosen order. May hold duplicates and
    /// references to deleted forms.
    #[serde(default)]
    pub enabled_form_ids: Vec<FormId>,
    pub scope: Scope,
    /// Cached display name of the project or team.
    #[serde(default)]
    pub scope_name: Option<String>,
    #[serde(default)]
    pub display: DisplaySettings,
    pub created_at: Timestamp,
}

impl View {
    /// Returns `true` if the view has an expiry strictly before `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| at.is_before(now))
    }

    /// Returns the visitor-facing projection of this view.
    pub fn public_summary(&self) -> PublicView {
        PublicView {
            id: self.id.clone(),
            slug: self.slug.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            scope: self.scope.clone(),
            scope_name: self.scope_name.clone(),
            display: self.display,
            password_protected: self.password_protected,
            allow_submission: self.allow_submission,
            created_at: self.created_at,
        }
    }
}

/// What visitors learn about a view once access is granted.
///
/// Excludes the owner, the password hash, the hidden statuses and the form
/// wiring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicView {
    pub id: ViewId,
    pub slug: ViewSlug,
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub scope: Scope,
    pub scope_name: Option<String>,
    pub display: DisplaySettings,
    pub password_protected: bool,
    pub allow_submission: bool,
    pub created_at: Timestamp,
}
