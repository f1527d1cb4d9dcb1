//! HTTP API
//!
//! Routers for every resource, merged into one application router.

use axum::{routing::get, Json, Router};

use crate::auth::auth_api::auth_router;
use crate::principal::api::users_router;
use crate::shared::middleware::AppState;

pub use crate::shared::middleware::Authenticated;

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Full application router with state applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(auth_router())
        .merge(users_router())
        .with_state(state)
}
