//! HTTP surfaces for the two services.
//!
//! Both routers share one state shape: a generator for reads and an
//! override store for mutations. They are separate routers because the two
//! services run as separate processes on separate ports, mimicking the real
//! deployment topology.

mod jira;
mod tempo;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::gen::Generator;
use crate::store::OverrideStore;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Generator>,
    pub store: OverrideStore,
}

pub fn create_jira_router(engine: Arc<Generator>, store: OverrideStore) -> Router {
    let api = Router::new()
        .route("/search/jql", get(jira::search_get))
        .route("/search", post(jira::search_post))
        .route("/issue", post(jira::create_issue))
        .route("/issue/{key}", get(jira::get_issue))
        .route("/issue/{key}", put(jira::update_issue))
        .route("/issue/{key}/transitions", get(jira::get_transitions))
        .route("/issue/{key}/transitions", post(jira::apply_transition))
        .route("/project", get(jira::list_projects))
        .route("/project/{key}", get(jira::get_project))
        .route("/user/search", get(jira::search_users))
        .route("/status", get(jira::list_statuses))
        .route("/priority", get(jira::list_priorities))
        .route("/issuetype", get(jira::list_issue_types))
        .route("/myself", get(jira::myself));

    Router::new()
        .nest("/rest/api/3", api)
        .route("/health", get(health))
        .route("/stats", get(stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { engine, store })
}

pub fn create_tempo_router(engine: Arc<Generator>, store: OverrideStore) -> Router {
    let api = Router::new()
        .route("/worklogs", get(tempo::search_worklogs).post(tempo::create_worklog))
        .route("/worklogs/{id}", get(tempo::get_worklog))
        .route("/accounts", get(tempo::list_accounts))
        .route("/accounts/{key}", get(tempo::get_account))
        .route("/teams", get(tempo::list_teams))
        .route("/teams/{id}", get(tempo::get_team))
        .route("/teams/{id}/members", get(tempo::list_team_members))
        .route("/plans", get(tempo::search_plans))
        .route("/users", get(tempo::list_users))
        .route("/users/{account_id}", get(tempo::get_user))
        .route("/roles", get(tempo::list_roles))
        .route("/account-categories", get(tempo::list_account_categories));

    Router::new()
        .nest("/4", api)
        .route("/health", get(health))
        .route("/stats", get(stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { engine, store })
}

/// Map an engine lookup failure to a 404.
fn not_found(e: crate::error::Error) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, e.to_string())
}

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "dataset": state.engine.stats(),
        "overrides": state.store.stats(),
    }))
}
