//! Response payloads as Linear returns them, and their mapping into domain types.

use domain::{
    sort_states_by_position, CreatedItem, ExternalItem, ItemId, ItemStatus, Label, LabelId,
    Person, Priority, ScopeMetadata, StateId, StateKind, TeamId, Timestamp, UserId,
    WorkflowState,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct IssuesData {
    pub issues: IssuePage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssuePage {
    pub nodes: Vec<IssueNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueNode {
    id: ItemId,
    identifier: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: f64,
    #[serde(default)]
    url: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
    state: StateNode,
    #[serde(default)]
    assignee: Option<UserNode>,
    #[serde(default)]
    labels: Option<Connection<LabelNode>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StateNode {
    id: StateId,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    position: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserNode {
    id: UserId,
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default = "active_by_default")]
    active: bool,
}

fn active_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(crate) struct LabelNode {
    id: LabelId,
    name: String,
    #[serde(default)]
    color: Option<String>,
}

/// Linear reports priority as a float; anything outside `0..=4` becomes "no priority".
fn priority_from(raw: f64) -> Priority {
    if raw.is_finite() && raw >= 0.0 {
        Priority::new(raw.round() as u8).unwrap_or(Priority::NONE)
    } else {
        Priority::NONE
    }
}

impl From<StateNode> for WorkflowState {
    fn from(node: StateNode) -> Self {
        WorkflowState {
            id: node.id,
            name: node.name,
            kind: StateKind::parse(&node.kind),
            color: node.color,
            position: node.position,
        }
    }
}

impl From<UserNode> for Person {
    fn from(node: UserNode) -> Self {
        Person {
            id: node.id,
            name: node.name,
            display_name: node.display_name,
            avatar_url: node.avatar_url,
            active: node.active,
        }
    }
}

impl From<LabelNode> for Label {
    fn from(node: LabelNode) -> Self {
        Label {
            id: node.id,
            name: node.name,
            color: node.color,
        }
    }
}

impl From<IssueNode> for ExternalItem {
    fn from(node: IssueNode) -> Self {
        ExternalItem {
            id: node.id,
            identifier: node.identifier,
            title: node.title,
            description: node.description,
            status: ItemStatus {
                id: node.state.id,
                name: node.state.name,
                kind: StateKind::parse(&node.state.kind),
                color: node.state.color,
            },
            assignee: node.assignee.map(Person::from),
            labels: node
                .labels
                .map(|c| c.nodes.into_iter().map(Label::from).collect())
                .unwrap_or_default(),
            priority: priority_from(node.priority),
            url: node.url,
            created_at: node.created_at,
            updated_at: node.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct TeamData {
    pub team: Option<TeamNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TeamNode {
    id: TeamId,
    #[serde(default)]
    triage_enabled: bool,
    #[serde(default)]
    triage_issue_state: Option<StateNode>,
    states: Connection<StateNode>,
    #[serde(default)]
    members: Option<Connection<UserNode>>,
    #[serde(default)]
    labels: Option<Connection<LabelNode>>,
}

impl From<TeamNode> for ScopeMetadata {
    fn from(node: TeamNode) -> Self {
        let mut states: Vec<WorkflowState> =
            node.states.nodes.into_iter().map(WorkflowState::from).collect();
        sort_states_by_position(&mut states);
        ScopeMetadata {
            team_id: node.id,
            states,
            triage_enabled: node.triage_enabled,
            triage_state: node.triage_issue_state.map(WorkflowState::from),
            members: node
                .members
                .map(|c| c.nodes.into_iter().map(Person::from).collect())
                .unwrap_or_default(),
            labels: node
                .labels
                .map(|c| c.nodes.into_iter().map(Label::from).collect())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectData {
    pub project: Option<ProjectNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectNode {
    pub teams: Connection<TeamRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamRef {
    pub id: TeamId,
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueCreateData {
    pub issue_create: IssueCreatePayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueCreatePayload {
    pub success: bool,
    #[serde(default)]
    pub issue: Option<CreatedNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedNode {
    id: ItemId,
    identifier: String,
    #[serde(default)]
    url: Option<String>,
}

impl From<CreatedNode> for CreatedItem {
    fn from(node: CreatedNode) -> Self {
        CreatedItem {
            id: node.id,
            identifier: node.identifier,
            url: node.url,
        }
    }
}
