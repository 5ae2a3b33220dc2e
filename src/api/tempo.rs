//! Handlers for the tempo-shaped surface.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Error;
use crate::gen::catalog::{ACCOUNT_CATEGORIES, TEAM_ROLES};
use crate::gen::WorklogQuery;
use crate::models::tempo::{
    Account, AccountCategory, OffsetPage, Plan, Team, TeamMember, TeamRole, TempoUser, Worklog,
    WorklogAttribute, WorklogIssue,
};

use super::{internal_error, not_found, AppState};

type HandlerError = (StatusCode, String);

fn split_csv(value: &Option<String>) -> Vec<String> {
    value
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn paginate<T: Clone>(items: Vec<T>, offset: u64, limit: u64) -> OffsetPage<T> {
    let total = items.len() as u64;
    let results = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    OffsetPage {
        results,
        total,
        offset,
        limit,
    }
}

// ============================================================
// Worklogs
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogParams {
    /// Comma-separated issue keys.
    issue: Option<String>,
    /// Comma-separated project keys.
    project: Option<String>,
    /// Comma-separated author account ids.
    user: Option<String>,
    account_key: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    offset: Option<u64>,
    limit: Option<u64>,
}

pub async fn search_worklogs(
    State(state): State<AppState>,
    Query(params): Query<WorklogParams>,
) -> Json<OffsetPage<Worklog>> {
    let query = WorklogQuery {
        issue_keys: split_csv(&params.issue),
        project_keys: split_csv(&params.project),
        account_ids: split_csv(&params.user),
        account_key: params.account_key.clone(),
        from: params.from,
        to: params.to,
    };

    let mut worklogs = state.engine.search_worklogs(&query);

    // Created records go through the same filters as generated ones.
    let scoped = |w: &Worklog| {
        (query.issue_keys.is_empty() || query.issue_keys.contains(&w.issue.key))
            && (query.project_keys.is_empty()
                || query
                    .project_keys
                    .iter()
                    .any(|p| w.issue.key.starts_with(&format!("{p}-"))))
    };
    worklogs.extend(
        state
            .store
            .created_worklogs()
            .into_iter()
            .filter(|w| scoped(w) && query.matches(w)),
    );
    worklogs.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then(a.tempo_worklog_id.cmp(&b.tempo_worklog_id))
    });

    Json(paginate(
        worklogs,
        params.offset.unwrap_or(0),
        params.limit.unwrap_or(50),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorklogBody {
    issue_key: String,
    time_spent_seconds: i64,
    billable_seconds: Option<i64>,
    start_date: NaiveDate,
    start_time: Option<String>,
    description: Option<String>,
    author_account_id: String,
    attributes: Option<Vec<WorklogAttribute>>,
}

pub async fn create_worklog(
    State(state): State<AppState>,
    Json(body): Json<CreateWorklogBody>,
) -> Result<(StatusCode, Json<Worklog>), HandlerError> {
    let issue = state
        .engine
        .issue_by_key(&body.issue_key)
        .map_err(not_found)?;
    let author = state
        .engine
        .user_by_account_id(&body.author_account_id)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let now = chrono::Utc::now();
    let worklog = Worklog {
        tempo_worklog_id: 0,
        jira_worklog_id: 0,
        issue: WorklogIssue {
            id: issue.id.parse().map_err(internal_error)?,
            key: issue.key.clone(),
            self_url: issue.self_url.clone(),
        },
        time_spent_seconds: body.time_spent_seconds,
        billable_seconds: body.billable_seconds.unwrap_or(body.time_spent_seconds),
        start_date: body.start_date,
        start_time: body.start_time.unwrap_or_else(|| "09:00:00".to_string()),
        description: body.description.unwrap_or_default(),
        created_at: now,
        updated_at: now,
        author: TempoUser::from(&author),
        attributes: body.attributes.unwrap_or_default(),
        self_url: String::new(),
    };

    let stored = state.store.insert_worklog(worklog).map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn get_worklog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Worklog>, HandlerError> {
    state
        .store
        .worklog(id)
        .map(Json)
        .ok_or_else(|| not_found(Error::UnknownWorklog(id)))
}

// ============================================================
// Accounts
// ============================================================

#[derive(Debug, Deserialize)]
pub struct PageParams {
    offset: Option<u64>,
    limit: Option<u64>,
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Json<OffsetPage<Account>> {
    Json(paginate(
        state.engine.accounts().to_vec(),
        params.offset.unwrap_or(0),
        params.limit.unwrap_or(50),
    ))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Account>, HandlerError> {
    state.engine.account_by_key(&key).map(Json).map_err(not_found)
}

// ============================================================
// Teams
// ============================================================

pub async fn list_teams(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Json<OffsetPage<Team>> {
    Json(paginate(
        state.engine.teams(),
        params.offset.unwrap_or(0),
        params.limit.unwrap_or(50),
    ))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Team>, HandlerError> {
    state.engine.team_by_id(id).map(Json).map_err(not_found)
}

pub async fn list_team_members(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<TeamMember>>, HandlerError> {
    state.engine.team_members(id).map(Json).map_err(not_found)
}

// ============================================================
// Plans
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanParams {
    /// Comma-separated assignee account ids.
    assignee: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    offset: Option<u64>,
    limit: Option<u64>,
}

pub async fn search_plans(
    State(state): State<AppState>,
    Query(params): Query<PlanParams>,
) -> Json<OffsetPage<Plan>> {
    let assignees = split_csv(&params.assignee);
    let plans = state.engine.search_plans(&assignees, params.from, params.to);
    Json(paginate(
        plans,
        params.offset.unwrap_or(0),
        params.limit.unwrap_or(50),
    ))
}

// ============================================================
// Users and catalogs
// ============================================================

#[derive(Debug, Deserialize)]
pub struct UserParams {
    query: Option<String>,
    limit: Option<u64>,
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<UserParams>,
) -> Json<Vec<TempoUser>> {
    let users = state.engine.search_users(
        params.query.as_deref().unwrap_or(""),
        params.limit.unwrap_or(50),
    );
    Json(users.iter().map(TempoUser::from).collect())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<TempoUser>, HandlerError> {
    state
        .engine
        .user_by_account_id(&account_id)
        .map(|u| Json(TempoUser::from(&u)))
        .map_err(not_found)
}

pub async fn list_roles() -> Json<Vec<TeamRole>> {
    Json(TEAM_ROLES.clone())
}

pub async fn list_account_categories() -> Json<Vec<AccountCategory>> {
    Json(ACCOUNT_CATEGORIES.clone())
}
