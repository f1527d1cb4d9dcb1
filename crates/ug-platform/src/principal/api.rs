//! Users API
//!
//! Viewer lookup, cursor-paginated listing, and the role-gated mutations.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::principal::entity::Principal;
use crate::principal::operations::CreateUserCommand;
use crate::principal::pager::ListScope;
use crate::shared::api_common::{parse_path_id, ConnectionParams};
use crate::shared::connection::Connection;
use crate::shared::error::PlatformError;
use crate::shared::middleware::{AppState, Authenticated};
use crate::usecase::UseCaseResult;

/// Mutation payload wrapping the affected user
#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: Principal,
}

/// The acting user
pub async fn viewer(auth: Authenticated) -> Json<Principal> {
    Json(auth.0.principal)
}

/// List users visible to the caller
pub async fn list_users(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(params): Query<ConnectionParams>,
) -> Result<Json<Connection<Principal>>, PlatformError> {
    let scope = ListScope::for_principal(&auth.0.principal);
    let page = state.pager.page(scope, params.page_size(), params.cursor()).await?;
    Ok(Json(page))
}

/// Create a user (admins only)
///
/// Validation failures come back as `422` with the `FAILURE` payload.
pub async fn create_user(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(command): Json<CreateUserCommand>,
) -> Result<(StatusCode, Json<UseCaseResult<UserPayload>>), PlatformError> {
    let result = state.create_user.execute(command, &auth.0).await?;

    let status = if result.is_success() {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((status, Json(result.map(|user| UserPayload { user }))))
}

/// Suspend a user (admins only)
pub async fn suspend_user(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<UserPayload>, PlatformError> {
    let user = state.suspend_user.execute(parse_path_id(&id)?, &auth.0).await?;
    Ok(Json(UserPayload { user }))
}

/// Lift a suspension (admins only)
pub async fn activate_user(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<UserPayload>, PlatformError> {
    let user = state.activate_user.execute(parse_path_id(&id)?, &auth.0).await?;
    Ok(Json(UserPayload { user }))
}

/// Create users router
pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/viewer", get(viewer))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}/suspend", post(suspend_user))
        .route("/users/{id}/activate", post(activate_user))
}
