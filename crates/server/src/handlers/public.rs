//! Anonymous visitor handlers

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use domain::{
    CreatedItem, ExternalItem, FormId, FormSummary, LabelId, Priority, PublicView, QuestionId,
    ScopeMetadata, StateId, Submission, UserId,
};
use gateway::SubmitRequest;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the view password on GET requests.
pub const PASSWORD_HEADER: &str = "x-view-password";

/// Unlock request
#[derive(Debug, Default, Deserialize)]
pub struct PasswordBody {
    #[serde(default)]
    pub password: Option<String>,
}

/// Granted view response
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub success: bool,
    pub view: PublicView,
    pub issues: Vec<ExternalItem>,
}

/// Offered forms response
#[derive(Debug, Serialize)]
pub struct FormsResponse {
    pub success: bool,
    pub forms: Vec<FormSummary>,
}

/// Submission-form metadata response
#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub success: bool,
    pub metadata: ScopeMetadata,
}

/// Item creation request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateIssueBody {
    pub title: String,
    pub description: String,
    pub state_id: Option<StateId>,
    pub state_name: Option<String>,
    pub form_id: Option<FormId>,
    pub answers: BTreeMap<QuestionId, String>,
    pub priority: Priority,
    pub assignee_id: Option<UserId>,
    pub label_ids: Vec<LabelId>,
    pub password: Option<String>,
}

impl From<CreateIssueBody> for SubmitRequest {
    fn from(body: CreateIssueBody) -> Self {
        // Clients send empty strings for unselected pickers.
        SubmitRequest {
            submission: Submission {
                title: body.title,
                description: body.description,
                answers: body.answers,
                state_id: body.state_id.filter(|id| !id.as_str().is_empty()),
                state_name: body.state_name.filter(|name| !name.trim().is_empty()),
                priority: body.priority,
                assignee: body.assignee_id.filter(|id| !id.as_str().is_empty()),
                labels: body
                    .label_ids
                    .into_iter()
                    .filter(|id| !id.as_str().is_empty())
                    .collect(),
            },
            form_id: body.form_id.filter(|id| !id.as_str().is_empty()),
            password: body.password,
        }
    }
}

/// Item creation response
#[derive(Debug, Serialize)]
pub struct CreateIssueResponse {
    pub success: bool,
    pub issue: CreatedItem,
}

/// Read a view without a password
pub async fn get_public_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ViewResponse>> {
    respond_with_view(&state, &slug, None).await
}

/// Read a view with a password
pub async fn unlock_public_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Option<Json<PasswordBody>>,
) -> ApiResult<Json<ViewResponse>> {
    let password = body.and_then(|Json(body)| body.password);
    respond_with_view(&state, &slug, password.as_deref()).await
}

async fn respond_with_view(
    state: &AppState,
    slug: &str,
    password: Option<&str>,
) -> ApiResult<Json<ViewResponse>> {
    let page = state.gateway.read_view(slug, password).await?;
    Ok(Json(ViewResponse {
        success: true,
        view: page.view,
        issues: page.items,
    }))
}

/// List the forms a view offers
pub async fn list_view_forms(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<FormsResponse>> {
    let forms = state.gateway.list_forms(&slug).await?;
    Ok(Json(FormsResponse {
        success: true,
        forms,
    }))
}

/// Read workflow states, members and labels for the submission form
pub async fn get_view_metadata(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<MetadataResponse>> {
    let password = headers
        .get(PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok());
    let metadata = state.gateway.scope_metadata(&slug, password).await?;
    Ok(Json(MetadataResponse {
        success: true,
        metadata,
    }))
}

/// Create an item from a visitor submission
pub async fn create_issue(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Result<Json<CreateIssueBody>, JsonRejection>,
) -> ApiResult<Json<CreateIssueResponse>> {
    let Json(body) = body?;
    let issue = state.gateway.submit(&slug, body.into()).await?;
    Ok(Json(CreateIssueResponse {
        success: true,
        issue,
    }))
}
