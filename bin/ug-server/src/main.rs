//! UserGate Server
//!
//! Serves the session, impersonation and user administration APIs.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `UG_CONFIG` | - | Path to a TOML config file |
//! | `UG_HTTP_HOST` | `0.0.0.0` | Bind address |
//! | `UG_HTTP_PORT` | `4000` | HTTP API port |
//! | `UG_CORS_ORIGINS` | `*` | Comma-separated allowed origins |
//! | `UG_DATABASE_URL` | - | Postgres URL; in-memory store when unset |
//! | `UG_DATABASE_MAX_CONNECTIONS` | `10` | Pool size |
//! | `UG_JWT_SECRET` | - | HS256 signing secret (required) |
//! | `UG_TOKEN_TTL_SECS` | `7200` | Session token lifetime |
//! | `LOG_FORMAT` | `text` | `json` or `text` |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use ug_config::{AppConfig, ConfigLoader};
use ug_platform::auth::{Argon2Config, PasswordService, TokenCodec, TokenConfig};
use ug_platform::principal::{InMemoryPrincipalRepository, PgPrincipalRepository, PrincipalRepository};
use ug_platform::{api, AppState, Clock, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    ug_common::init_logging("ug-server");

    info!("Starting UserGate Server");

    let config = ConfigLoader::new().load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let codec = Arc::new(TokenCodec::new(
        TokenConfig::from(&config.auth),
        clock.clone(),
    )?);
    let passwords = Arc::new(PasswordService::new(Argon2Config::default())?);
    let principals = principal_repository(&config).await?;

    let state = AppState::new(principals, passwords, codec, clock);

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.http.cors_origins));

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("UserGate Server stopped");
    Ok(())
}

async fn principal_repository(config: &AppConfig) -> Result<Arc<dyn PrincipalRepository>> {
    if config.database.url.is_empty() {
        warn!("No database URL configured, users are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryPrincipalRepository::new()));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("failed to connect to Postgres")?;
    info!(max_connections = config.database.max_connections, "Connected to Postgres");

    Ok(Arc::new(PgPrincipalRepository::new(pool)))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
