//! Read-only projections of tracker data and the item-creation payload.
//!
//! [`ExternalItem`] and [`ScopeMetadata`] are owned by the tracker; Glasspane
//! never persists them. [`ItemPayload`] is the only thing Glasspane ever asks
//! the tracker to create.

use serde::{Deserialize, Serialize};

use crate::{ItemId, LabelId, Priority, ProjectId, Scope, StateId, StatusSet, TeamId, Timestamp, UserId};

// ---------------------------------------------------------------------------
// Workflow states
// ---------------------------------------------------------------------------

/// The category a workflow state belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Triage,
    Backlog,
    Unstarted,
    Started,
    Completed,
    Canceled,
    /// A category this version does not know about; kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl StateKind {
    /// Parses the tracker's state type string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "triage" => StateKind::Triage,
            "backlog" => StateKind::Backlog,
            "unstarted" => StateKind::Unstarted,
            "started" => StateKind::Started,
            "completed" => StateKind::Completed,
            "canceled" => StateKind::Canceled,
            other => StateKind::Other(other.to_string()),
        }
    }
}

/// A workflow state (board column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub id: StateId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StateKind,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub position: f64,
}

/// Sorts states by their board position (stable for ties).
pub fn sort_states_by_position(states: &mut [WorkflowState]) {
    states.sort_by(|a, b| a.position.total_cmp(&b.position));
}

// ---------------------------------------------------------------------------
// People and labels
// ---------------------------------------------------------------------------

/// A tracker user as shown on an item or offered as an assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A tracker label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// The status of an item as shown to visitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStatus {
    pub id: StateId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StateKind,
    #[serde(default)]
    pub color: Option<String>,
}

/// A tracker item, as fetched for a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalItem {
    pub id: ItemId,
    /// Human-facing key such as `ENG-42`.
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "state")]
    pub status: ItemStatus,
    #[serde(default)]
    pub assignee: Option<Person>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What to fetch from the tracker for one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    pub scope: Scope,
    /// Upstream status-name filter; `None` fetches every status.
    pub status_filter: Option<StatusSet>,
}

impl ItemQuery {
    /// Builds a query, dropping an empty filter.
    pub fn new(scope: Scope, allowed_statuses: &StatusSet) -> Self {
        Self {
            scope,
            status_filter: (!allowed_statuses.is_empty()).then(|| allowed_statuses.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Scope metadata
// ---------------------------------------------------------------------------

/// Workflow configuration of the team a scope resolves to.
///
/// Drives default-state selection for submissions and populates the
/// assignee/label pickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeMetadata {
    /// Team new items are created in. For a project scope this is the first
    /// team the project belongs to.
    pub team_id: TeamId,
    /// States ordered by board position.
    pub states: Vec<WorkflowState>,
    pub triage_enabled: bool,
    #[serde(default)]
    pub triage_state: Option<WorkflowState>,
    #[serde(default)]
    pub members: Vec<Person>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// A fully validated item-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub title: String,
    pub description: String,
    pub state: Option<StateId>,
    pub priority: Priority,
    pub assignee: Option<UserId>,
    pub labels: Vec<LabelId>,
    pub team: TeamId,
    pub project: Option<ProjectId>,
}

/// The tracker's acknowledgement of a created item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedItem {
    pub id: ItemId,
    pub identifier: String,
    #[serde(default)]
    pub url: Option<String>,
}
