//! Session API
//!
//! `POST /session`, `POST /impersonate` and `DELETE /unimpersonate`. Each
//! returns a new token; the previous one stays valid until it expires.

use axum::{
    extract::State,
    routing::{delete, post},
    Json, Router,
};
use serde::Deserialize;

use crate::shared::api_common::{string_or_number, TokenResponse};
use crate::shared::error::PlatformError;
use crate::shared::middleware::{AppState, Authenticated};

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpersonateRequest {
    #[serde(deserialize_with = "string_or_number::deserialize_i64")]
    pub user_id: i64,
}

/// Sign in with email and password
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<TokenResponse>, PlatformError> {
    let token = state.sessions.issue_session(&req.email, &req.password).await?;
    Ok(Json(TokenResponse::new(token)))
}

/// Start acting as another user (admins only)
pub async fn impersonate(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(req): Json<ImpersonateRequest>,
) -> Result<Json<TokenResponse>, PlatformError> {
    let token = state.sessions.begin_impersonation(&auth.0, req.user_id).await?;
    Ok(Json(TokenResponse::new(token)))
}

/// Return to the impersonating administrator
pub async fn unimpersonate(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<TokenResponse>, PlatformError> {
    let token = state.sessions.end_impersonation(&auth.0).await?;
    Ok(Json(TokenResponse::new(token)))
}

/// Create session router
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/session", post(create_session))
        .route("/impersonate", post(impersonate))
        .route("/unimpersonate", delete(unimpersonate))
}
