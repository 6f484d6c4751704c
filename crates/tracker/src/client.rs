//! The Linear GraphQL client.

use std::time::Duration;

use async_trait::async_trait;
use domain::{
    CreatedItem, Credential, ExternalItem, IssueSource, ItemPayload, ItemQuery, Scope,
    ScopeMetadata, TeamId, TrackerError,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::graphql::{
    Envelope, ISSUES_QUERY, ISSUE_CREATE_MUTATION, PROJECT_TEAMS_QUERY, TEAM_METADATA_QUERY,
};
use crate::wire::{IssueCreateData, IssuesData, ProjectData, TeamData};

/// Connection settings for the tracker API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// GraphQL endpoint.
    pub endpoint: String,
    /// Items requested per page.
    pub page_size: u32,
    /// Upper bound on pages fetched for one view.
    pub max_pages: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.linear.app/graphql".to_string(),
            page_size: 100,
            max_pages: 10,
            timeout_secs: 30,
        }
    }
}

/// [`IssueSource`] backed by Linear's GraphQL API.
///
/// The owner's API key is sent as-is in the `Authorization` header. No request
/// is retried.
#[derive(Debug, Clone)]
pub struct LinearClient {
    http: reqwest::Client,
    settings: TrackerSettings,
}

impl LinearClient {
    /// Builds a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// [`TrackerError::Transport`] if the HTTP client cannot be constructed
    /// (for example, no TLS backend is available).
    pub fn new(settings: TrackerSettings) -> Result<Self, TrackerError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("glasspane/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| TrackerError::Transport(err.to_string()))?;
        Ok(Self { http, settings })
    }

    /// Posts one GraphQL document and decodes its `data` member.
    async fn execute<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        query: &str,
        variables: Value,
    ) -> Result<T, TrackerError> {
        let response = self
            .http
            .post(&self.settings.endpoint)
            .header(reqwest::header::AUTHORIZATION, credential.expose())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|err| TrackerError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| TrackerError::Transport(err.to_string()))?;

        // Linear answers validation failures with a 4xx status and a GraphQL
        // error body; prefer the error messages over the bare status.
        let envelope: Envelope<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TrackerError::Transport(format!("HTTP {status}")));
            }
            Err(err) => return Err(TrackerError::Decode(err.to_string())),
        };
        if let Some(message) = envelope.error_message() {
            return Err(TrackerError::Rejected(message));
        }
        if !status.is_success() {
            return Err(TrackerError::Transport(format!("HTTP {status}")));
        }
        envelope
            .data
            .ok_or_else(|| TrackerError::Decode("response carried no data".to_string()))
    }

    async fn team_for_project(
        &self,
        credential: &Credential,
        project: &str,
    ) -> Result<TeamId, TrackerError> {
        let data: ProjectData = self
            .execute(credential, PROJECT_TEAMS_QUERY, json!({ "id": project }))
            .await?;
        let project_node = data
            .project
            .ok_or_else(|| TrackerError::ScopeNotFound(format!("project:{project}")))?;
        project_node
            .teams
            .nodes
            .into_iter()
            .next()
            .map(|t| t.id)
            .ok_or_else(|| {
                TrackerError::ScopeNotFound(format!("project:{project} belongs to no team"))
            })
    }
}

/// Builds the `IssueFilter` for a query.
fn issue_filter(query: &ItemQuery) -> Value {
    let mut filter = match &query.scope {
        Scope::Project(id) => json!({ "project": { "id": { "eq": id.as_str() } } }),
        Scope::Team(id) => json!({ "team": { "id": { "eq": id.as_str() } } }),
    };
    if let Some(statuses) = &query.status_filter {
        let names: Vec<&str> = statuses.iter().collect();
        filter["state"] = json!({ "name": { "in": names } });
    }
    filter
}

/// Builds the `IssueCreateInput`, omitting unset optional fields.
fn create_input(payload: &ItemPayload) -> Value {
    let mut input = json!({
        "teamId": payload.team.as_str(),
        "title": payload.title,
        "description": payload.description,
        "priority": payload.priority.as_u8(),
    });
    if let Some(state) = &payload.state {
        input["stateId"] = json!(state.as_str());
    }
    if let Some(assignee) = &payload.assignee {
        input["assigneeId"] = json!(assignee.as_str());
    }
    if !payload.labels.is_empty() {
        let labels: Vec<&str> = payload.labels.iter().map(|l| l.as_str()).collect();
        input["labelIds"] = json!(labels);
    }
    if let Some(project) = &payload.project {
        input["projectId"] = json!(project.as_str());
    }
    input
}

#[async_trait]
impl IssueSource for LinearClient {
    #[instrument(skip(self, credential, query), fields(scope = %query.scope))]
    async fn fetch_items(
        &self,
        credential: &Credential,
        query: &ItemQuery,
    ) -> Result<Vec<ExternalItem>, TrackerError> {
        let filter = issue_filter(query);
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 0..self.settings.max_pages {
            let data: IssuesData = self
                .execute(
                    credential,
                    ISSUES_QUERY,
                    json!({
                        "filter": filter,
                        "first": self.settings.page_size,
                        "after": cursor,
                    }),
                )
                .await?;
            items.extend(data.issues.nodes.into_iter().map(ExternalItem::from));

            match data.issues.page_info {
                info if info.has_next_page && info.end_cursor.is_some() => {
                    cursor = info.end_cursor;
                    if page + 1 == self.settings.max_pages {
                        warn!(
                            fetched = items.len(),
                            "page limit reached; remaining items are not shown"
                        );
                    }
                }
                _ => break,
            }
        }

        debug!(count = items.len(), "fetched items");
        Ok(items)
    }

    #[instrument(skip(self, credential, scope), fields(scope = %scope))]
    async fn fetch_metadata(
        &self,
        credential: &Credential,
        scope: &Scope,
    ) -> Result<ScopeMetadata, TrackerError> {
        let team = match scope {
            Scope::Team(id) => id.clone(),
            Scope::Project(id) => self.team_for_project(credential, id.as_str()).await?,
        };
        let data: TeamData = self
            .execute(
                credential,
                TEAM_METADATA_QUERY,
                json!({ "id": team.as_str() }),
            )
            .await?;
        data.team
            .map(ScopeMetadata::from)
            .ok_or_else(|| TrackerError::ScopeNotFound(format!("team:{team}")))
    }

    #[instrument(skip(self, credential, payload), fields(team = %payload.team))]
    async fn create_item(
        &self,
        credential: &Credential,
        payload: &ItemPayload,
    ) -> Result<CreatedItem, TrackerError> {
        let data: IssueCreateData = self
            .execute(
                credential,
                ISSUE_CREATE_MUTATION,
                json!({ "input": create_input(payload) }),
            )
            .await?;
        match data.issue_create {
            created if created.success => created
                .issue
                .map(CreatedItem::from)
                .ok_or_else(|| TrackerError::Decode("issueCreate returned no issue".to_string())),
            _ => Err(TrackerError::Rejected(
                "The tracker did not create the issue".to_string(),
            )),
        }
    }
}
