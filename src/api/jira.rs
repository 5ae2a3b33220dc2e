//! Handlers for the jira-shaped surface.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::gen::catalog::{status_named, ISSUE_TYPES, PRIORITIES, STATUSES};
use crate::gen::{transitions_from_status, SearchFilter, Window};
use crate::models::jira::{
    IssueType, PageResponse, Priority, Project, SearchResponse, Status, Transition, User,
};
use crate::store::merge_fields;

use super::{internal_error, not_found, AppState};

type HandlerError = (StatusCode, String);

// ============================================================
// Search
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    jql: Option<String>,
    start_at: Option<u64>,
    max_results: Option<u64>,
    year: Option<i32>,
}

fn run_search(state: &AppState, params: SearchParams) -> Result<SearchResponse, HandlerError> {
    let mut filter = SearchFilter::from_jql(params.jql.as_deref().unwrap_or(""));
    filter.year = params.year;
    let window = Window {
        start_at: params.start_at.unwrap_or(0),
        max_results: params.max_results.unwrap_or(50),
    };

    let result = state.engine.search(&filter, &window);
    let mut issues = Vec::with_capacity(result.issues.len());
    for issue in result.issues {
        let key = issue.key.clone();
        let mut value = serde_json::to_value(issue).map_err(internal_error)?;
        if let Some(patch) = state.store.issue_patch(&key) {
            if let Some(fields) = value.get_mut("fields") {
                merge_fields(fields, &patch);
            }
        }
        issues.push(value);
    }

    Ok(SearchResponse {
        start_at: window.start_at,
        max_results: window.max_results,
        total: result.total,
        is_last: window.start_at.saturating_add(window.max_results) >= result.total,
        issues,
    })
}

pub async fn search_get(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, HandlerError> {
    run_search(&state, params).map(Json)
}

pub async fn search_post(
    State(state): State<AppState>,
    Json(params): Json<SearchParams>,
) -> Result<Json<SearchResponse>, HandlerError> {
    run_search(&state, params).map(Json)
}

// ============================================================
// Issues
// ============================================================

pub async fn get_issue(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, HandlerError> {
    if let Some(created) = state.store.created_issue(&key) {
        return Ok(Json(created));
    }

    let issue = state.engine.issue_by_key(&key).map_err(not_found)?;
    let mut value = serde_json::to_value(issue).map_err(internal_error)?;
    if let Some(patch) = state.store.issue_patch(&key) {
        if let Some(fields) = value.get_mut("fields") {
            merge_fields(fields, &patch);
        }
    }
    Ok(Json(value))
}

#[derive(Debug, Deserialize)]
pub struct IssueBody {
    fields: Value,
}

pub async fn create_issue(
    State(state): State<AppState>,
    Json(body): Json<IssueBody>,
) -> Result<(StatusCode, Json<Value>), HandlerError> {
    let project_key = body
        .fields
        .get("project")
        .and_then(|p| p.get("key"))
        .and_then(Value::as_str)
        .ok_or((
            StatusCode::BAD_REQUEST,
            "fields.project.key is required".to_string(),
        ))?
        .to_string();
    state.engine.project_by_key(&project_key).map_err(not_found)?;

    let issue = state
        .store
        .insert_issue(&project_key, body.fields)
        .map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(issue)))
}

pub async fn update_issue(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<IssueBody>,
) -> Result<StatusCode, HandlerError> {
    if state
        .store
        .patch_created_issue(&key, &body.fields)
        .map_err(internal_error)?
    {
        return Ok(StatusCode::NO_CONTENT);
    }

    state.engine.issue_by_key(&key).map_err(not_found)?;
    state
        .store
        .patch_issue(&key, body.fields)
        .map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Transitions
// ============================================================

/// Current status name with overrides applied: a created record's own
/// status, then any patch, then the generated value.
fn effective_status_name(state: &AppState, key: &str) -> Result<String, HandlerError> {
    let patched_name = |fields: &Value| {
        fields
            .get("status")
            .and_then(|s| s.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    if let Some(created) = state.store.created_issue(key) {
        return Ok(created
            .get("fields")
            .and_then(|f| patched_name(f))
            .unwrap_or_else(|| "Open".to_string()));
    }
    if let Some(patch) = state.store.issue_patch(key) {
        if let Some(name) = patched_name(&patch) {
            return Ok(name);
        }
    }
    let issue = state.engine.issue_by_key(key).map_err(not_found)?;
    Ok(issue.fields.status.name)
}

pub async fn get_transitions(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>, HandlerError> {
    let status = effective_status_name(&state, &key)?;
    let transitions = transitions_from_status(&status);
    Ok(Json(serde_json::json!({ "transitions": transitions })))
}

#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    transition: TransitionId,
}

#[derive(Debug, Deserialize)]
pub struct TransitionId {
    id: String,
}

pub async fn apply_transition(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<TransitionBody>,
) -> Result<StatusCode, HandlerError> {
    let status = effective_status_name(&state, &key)?;
    let target: Transition = transitions_from_status(&status)
        .into_iter()
        .find(|t| t.id == body.transition.id)
        .ok_or_else(|| {
            tracing::warn!(key = %key, id = %body.transition.id, "invalid transition");
            (
                StatusCode::BAD_REQUEST,
                format!("transition {} is not available from {status}", body.transition.id),
            )
        })?;

    let patch = serde_json::json!({ "status": status_named(&target.name) });
    if state
        .store
        .patch_created_issue(&key, &patch)
        .map_err(internal_error)?
    {
        return Ok(StatusCode::NO_CONTENT);
    }
    state
        .store
        .patch_issue(&key, patch)
        .map_err(internal_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Projects
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectParams {
    start_at: Option<u64>,
    max_results: Option<u64>,
    year: Option<i32>,
}

pub async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<ProjectParams>,
) -> Json<PageResponse<Project>> {
    let start_at = params.start_at.unwrap_or(0);
    let max_results = params.max_results.unwrap_or(50);
    let page = match params.year {
        Some(year) => state.engine.projects_by_year(year, start_at, max_results),
        None => state.engine.project_page(start_at, max_results),
    };
    Json(page)
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Project>, HandlerError> {
    state.engine.project_by_key(&key).map(Json).map_err(not_found)
}

// ============================================================
// Users and catalogs
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchParams {
    query: Option<String>,
    max_results: Option<u64>,
}

pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<UserSearchParams>,
) -> Json<Vec<User>> {
    Json(state.engine.search_users(
        params.query.as_deref().unwrap_or(""),
        params.max_results.unwrap_or(50),
    ))
}

pub async fn myself(State(state): State<AppState>) -> Json<User> {
    Json(state.engine.user_at(0))
}

pub async fn list_statuses() -> Json<Vec<Status>> {
    Json(STATUSES.clone())
}

pub async fn list_priorities() -> Json<Vec<Priority>> {
    Json(PRIORITIES.clone())
}

pub async fn list_issue_types() -> Json<Vec<IssueType>> {
    Json(ISSUE_TYPES.clone())
}
