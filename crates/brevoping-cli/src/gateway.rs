//! Webhook gateway: receives Brevo "contact created" webhooks over HTTP.
//!
//! Each request runs payload → record → enrichment → dispatch and answers
//! with the channels that were attempted and their outcomes.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use brevoping_brevo::{enrich, BrevoClient};
use brevoping_channels::{enabled_channels, Dispatcher};
use brevoping_core::config::Config;
use brevoping_core::contact::parse_payload;
use brevoping_core::CoreError;

use crate::helpers;

/// Webhook route path.
pub const CONTACT_CREATED_PATH: &str = "/api/brevo/contact-created";

// ─────────────────────────────────────────────
// State
// ─────────────────────────────────────────────

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub brevo: Option<Arc<BrevoClient>>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::from_config(&config.channels)),
            brevo: helpers::build_brevo_client(&config.brevo, reqwest::Client::new()),
        }
    }
}

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// Request errors surfaced to the webhook caller.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Payload(#[from] CoreError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::Payload(_) => StatusCode::BAD_REQUEST,
        };
        warn!(status = %status, error = %self, "rejected webhook");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ─────────────────────────────────────────────
// Routes
// ─────────────────────────────────────────────

/// Build the gateway router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            CONTACT_CREATED_PATH,
            get(contact_created_info).post(contact_created),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "brevoping",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn contact_created_info() -> Json<Value> {
    Json(json!({ "ok": true, "message": "Brevo contact webhook endpoint" }))
}

async fn contact_created(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, GatewayError> {
    let record = parse_payload(&body)?;

    let record = match &state.brevo {
        Some(client) => enrich(client, record).await,
        None => record,
    };

    let result = state.dispatcher.dispatch(&record).await;

    let mut response = json!({ "ok": true, "dispatched": result.enabled_channels });
    if let Some(outcomes) = result.outcomes {
        response["outcomes"] = json!(outcomes);
    }
    Ok(Json(response))
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// Run the gateway until the process is stopped.
pub async fn run(config: Config) -> Result<()> {
    helpers::print_banner();

    let flags = config.channels.flags();
    let state = AppState::from_config(&config);
    let app = create_router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    println!("  Webhook:   http://{addr}{CONTACT_CREATED_PATH}");
    println!("  Channels:  {:?}", enabled_channels(&flags));
    println!();

    info!(
        addr = %addr,
        channels = ?enabled_channels(&flags),
        "gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server error")?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl+c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
