//! Owner form management handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use domain::{Form, FormId, GatewayError, OwnerId};
use gateway::{FormDiagnostics, FormPatch, NewForm, QuestionEdit};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormListResponse {
    pub success: bool,
    pub issue_forms: Vec<Form>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub success: bool,
    pub issue_form: Form,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub success: bool,
    pub diagnostics: FormDiagnostics,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn owner(state: &AppState, headers: &HeaderMap) -> ApiResult<OwnerId> {
    Ok(state.admin.authenticate(bearer_token(headers)).await?)
}

fn form_id(raw: &str) -> ApiResult<FormId> {
    FormId::new(raw).ok_or(ApiError::Gateway(GatewayError::FormNotFound))
}

/// List the caller's forms, newest first
pub async fn list_forms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<FormListResponse>> {
    let owner = owner(&state, &headers).await?;
    let issue_forms = state.admin.list(&owner).await?;
    Ok(Json(FormListResponse {
        success: true,
        issue_forms,
    }))
}

/// Create a form
pub async fn create_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<NewForm>, JsonRejection>,
) -> ApiResult<Json<FormResponse>> {
    let owner = owner(&state, &headers).await?;
    let Json(new) = body?;
    let issue_form = state.admin.create(&owner, new).await?;
    Ok(Json(FormResponse {
        success: true,
        issue_form,
    }))
}

/// Get one form
pub async fn get_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<FormResponse>> {
    let owner = owner(&state, &headers).await?;
    let issue_form = state.admin.get(&owner, &form_id(&id)?).await?;
    Ok(Json(FormResponse {
        success: true,
        issue_form,
    }))
}

/// Rename a form or replace its questions
pub async fn update_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<FormPatch>, JsonRejection>,
) -> ApiResult<Json<FormResponse>> {
    let owner = owner(&state, &headers).await?;
    let Json(patch) = body?;
    let issue_form = state.admin.update(&owner, &form_id(&id)?, patch).await?;
    Ok(Json(FormResponse {
        success: true,
        issue_form,
    }))
}

/// Apply one question-builder step
pub async fn edit_form_question(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<QuestionEdit>, JsonRejection>,
) -> ApiResult<Json<FormResponse>> {
    let owner = owner(&state, &headers).await?;
    let Json(edit) = body?;
    let issue_form = state
        .admin
        .edit_question(&owner, &form_id(&id)?, edit)
        .await?;
    Ok(Json(FormResponse {
        success: true,
        issue_form,
    }))
}

/// Delete a form
pub async fn delete_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let owner = owner(&state, &headers).await?;
    let deleted = state.admin.delete(&owner, &form_id(&id)?).await?;
    Ok(Json(DeleteResponse {
        success: true,
        deleted,
    }))
}

/// Report stale form references of one of the caller's views
pub async fn form_diagnostics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<Json<DiagnosticsResponse>> {
    let owner = owner(&state, &headers).await?;
    let diagnostics = state.admin.form_diagnostics(&owner, &slug).await?;
    Ok(Json(DiagnosticsResponse {
        success: true,
        diagnostics,
    }))
}
