use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::*,
    store::{Store, StoreError},
    tally::{self, VoteValue},
};

// ===== App State =====

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user))
        .route("/elements", get(list_elements).post(create_element))
        .route("/elements/search", get(search_elements))
        .route("/elements/link", post(link_elements))
        .route("/elements/:id", get(get_element))
        .route("/actions", get(list_actions).post(create_action))
        .route("/actions/:id", get(get_action))
        .route("/actions/:id/vote", post(vote_action))
        .route("/decisions/:action_id", get(decision_outcome))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn required(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

// ===== Handlers =====

async fn root() -> &'static str {
    "Cooperative decision-making backend - Use /health to check status"
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match state.store.ping().await {
        Ok(()) => "ok",
        Err(err) => {
            tracing::warn!("Health check failed: {err}");
            "error"
        }
    };
    Json(HealthResponse {
        status,
        store: state.store.backend(),
    })
}

// --- Users ---

async fn create_user(
    State(state): State<AppState>,
    Json(new): Json<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    required("username", &new.username)?;

    let user = state.store.create_user(new).await?;
    tracing::info!(user_id = %user.id, "Created user {}", user.username);
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.store.list_users().await?))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<User>> {
    state
        .store
        .get_user(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("user not found".into()))
}

// --- Elements ---

async fn create_element(
    State(state): State<AppState>,
    Json(new): Json<NewElement>,
) -> AppResult<(StatusCode, Json<Element>)> {
    required("title", &new.title)?;
    required("type", &new.element_type)?;

    let element = state.store.create_element(new).await?;
    tracing::info!(element_id = %element.id, "Created element {}", element.title);
    Ok((StatusCode::CREATED, Json(element)))
}

async fn list_elements(State(state): State<AppState>) -> AppResult<Json<Vec<Element>>> {
    Ok(Json(state.store.list_elements().await?))
}

async fn get_element(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Element>> {
    state
        .store
        .get_element(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("element not found".into()))
}

async fn search_elements(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
) -> AppResult<Json<Vec<Element>>> {
    Ok(Json(state.store.search_elements(&search.query).await?))
}

async fn link_elements(
    State(state): State<AppState>,
    Json(link): Json<LinkRequest>,
) -> AppResult<Json<MessageResponse>> {
    if link.element_id_1 == link.element_id_2 {
        return Err(AppError::BadRequest(
            "Cannot link an element to itself".into(),
        ));
    }

    // Unknown ids are a bad link request rather than a missing resource
    match state
        .store
        .link_elements(link.element_id_1, link.element_id_2)
        .await
    {
        Ok(()) => {}
        Err(StoreError::NotFound(_)) => {
            return Err(AppError::BadRequest(
                "At least one element not found".into(),
            ));
        }
        Err(err) => return Err(err.into()),
    }

    Ok(Json(MessageResponse {
        message: format!(
            "Linked elements {} and {}.",
            link.element_id_1, link.element_id_2
        ),
    }))
}

// --- Actions ---

async fn create_action(
    State(state): State<AppState>,
    Json(new): Json<NewAction>,
) -> AppResult<(StatusCode, Json<Action>)> {
    required("action_type", &new.action_type)?;

    let action = state.store.create_action(new).await?;
    tracing::info!(
        action_id = %action.id,
        user_id = %action.user_id,
        "Created {} action",
        action.action_type
    );
    Ok((StatusCode::CREATED, Json(action)))
}

async fn list_actions(State(state): State<AppState>) -> AppResult<Json<Vec<Action>>> {
    Ok(Json(state.store.list_actions().await?))
}

async fn get_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Action>> {
    state
        .store
        .get_action(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("action not found".into()))
}

async fn vote_action(
    State(state): State<AppState>,
    Path(action_id): Path<Uuid>,
    Json(vote_req): Json<VoteRequest>,
) -> AppResult<Json<Vote>> {
    let value =
        VoteValue::try_from(vote_req.value).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let vote = state
        .store
        .cast_vote(action_id, vote_req.user_id, value)
        .await?;
    tracing::debug!(%action_id, user_id = %vote.user_id, value = vote.value.as_i64(), "Vote cast");
    Ok(Json(vote))
}

// --- Decisions ---

async fn decision_outcome(
    State(state): State<AppState>,
    Path(action_id): Path<Uuid>,
) -> AppResult<Json<DecisionOutcome>> {
    let action = state
        .store
        .get_action(action_id)
        .await?
        .ok_or_else(|| AppError::NotFound("action not found".into()))?;
    let votes = state.store.votes_for(action_id).await?;

    Ok(Json(tally::decide(&action, votes)))
}
