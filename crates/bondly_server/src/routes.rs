//! HTTP routes for the couple message exchange.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use bondly_turns::{CoupleId, Message, RegistryStatus};
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

use crate::api::{CoupleRequest, ListQuery, PresenceResponse, SubmitRequest, TurnResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/messages", post(submit_message))
        .route("/api/couples/{couple_id}/messages", get(list_messages))
        .route("/api/couples/{couple_id}/turn", get(next_turn))
        .route("/api/game-master/connect", post(connect_game_master))
        .route("/api/game-master/disconnect", post(disconnect_game_master))
        .route("/api/game-master/status", get(game_master_status))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

/// Runs store work off the async executor; the SQLite store blocks on disk.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[instrument(skip(state, request), fields(couple_id = %request.couple_id, sender = ?request.sender))]
async fn submit_message(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    if let Err(e) = request.sender_role() {
        warn!(error = %e, "Rejected non-string sender role");
        return Err(e.into());
    }

    let message = blocking(move || {
        let sender = request.sender_role()?;
        Ok(state
            .validator
            .submit(&request.couple_id, sender, &request.text)?)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[instrument(skip(state, couple_id, query), fields(couple_id = %couple_id, since = ?query.since))]
async fn list_messages(
    State(state): State<AppState>,
    Path(couple_id): Path<CoupleId>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let log = blocking(move || {
        let store = state.validator.store();
        let log = match query.since {
            Some(offset) => store.list_since(&couple_id, offset)?,
            None => store.list(&couple_id)?,
        };
        Ok(log)
    })
    .await?;
    debug!(count = log.len(), "Returning messages");
    Ok(Json(log))
}

#[instrument(skip(state, couple_id), fields(couple_id = %couple_id))]
async fn next_turn(
    State(state): State<AppState>,
    Path(couple_id): Path<CoupleId>,
) -> Result<Json<TurnResponse>, ApiError> {
    let response = blocking(move || {
        let next = state.validator.next_sender(&couple_id)?;
        Ok(TurnResponse::new(couple_id, next))
    })
    .await?;
    Ok(Json(response))
}

#[instrument(skip(state, request), fields(couple_id = %request.couple_id))]
async fn connect_game_master(
    State(state): State<AppState>,
    Json(request): Json<CoupleRequest>,
) -> Json<PresenceResponse> {
    state.registry.connect(&request.couple_id);
    Json(PresenceResponse::new(request.couple_id, true))
}

#[instrument(skip(state, request), fields(couple_id = %request.couple_id))]
async fn disconnect_game_master(
    State(state): State<AppState>,
    Json(request): Json<CoupleRequest>,
) -> Json<PresenceResponse> {
    state.registry.disconnect(&request.couple_id);
    Json(PresenceResponse::new(request.couple_id, false))
}

#[instrument(skip(state))]
async fn game_master_status(State(state): State<AppState>) -> Json<RegistryStatus> {
    Json(state.registry.status())
}
