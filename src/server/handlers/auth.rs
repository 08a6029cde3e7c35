//! Dashboard login, refresh and logout.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::server::auth::AdminSession;
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::session::Session;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state.sessions.login(&request.username, &request.password).await?;
    Ok(Json(session))
}

pub async fn refresh(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
) -> Result<Json<Session>, ApiError> {
    let fresh = state.sessions.refresh(&session.token).await?;
    Ok(Json(fresh))
}

pub async fn logout(State(state): State<AppState>, AdminSession(session): AdminSession) -> StatusCode {
    state.sessions.logout(&session.token).await;
    StatusCode::NO_CONTENT
}
