//! GraphQL documents and the response envelope.

use serde::Deserialize;

pub(crate) const ISSUES_QUERY: &str = r#"
query GlasspaneIssues($filter: IssueFilter, $first: Int!, $after: String) {
  issues(filter: $filter, first: $first, after: $after, orderBy: updatedAt) {
    nodes {
      id
      identifier
      title
      description
      priority
      url
      createdAt
      updatedAt
      state { id name type color }
      assignee { id name displayName avatarUrl active }
      labels { nodes { id name color } }
    }
    pageInfo { hasNextPage endCursor }
  }
}
"#;

pub(crate) const TEAM_METADATA_QUERY: &str = r#"
query GlasspaneTeamMetadata($id: String!) {
  team(id: $id) {
    id
    triageEnabled
    triageIssueState { id name type color position }
    states { nodes { id name type color position } }
    members { nodes { id name displayName avatarUrl active } }
    labels { nodes { id name color } }
  }
}
"#;

pub(crate) const PROJECT_TEAMS_QUERY: &str = r#"
query GlasspaneProjectTeams($id: String!) {
  project(id: $id) {
    id
    teams(first: 1) { nodes { id } }
  }
}
"#;

pub(crate) const ISSUE_CREATE_MUTATION: &str = r#"
mutation GlasspaneIssueCreate($input: IssueCreateInput!) {
  issueCreate(input: $input) {
    success
    issue { id identifier url }
  }
}
"#;

/// `{ "data": ..., "errors": [...] }`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

impl<T> Envelope<T> {
    /// Joins every error message, or `None` if the response carried none.
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
