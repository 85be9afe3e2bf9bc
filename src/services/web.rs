//! Axum-based HTTP bridge for previewing the card on a desktop.
//!
//! The bridge stands in for the dashboard host. It provides REST endpoints for:
//! - GET `/api/view` - Current render output
//! - POST `/api/states` - Push a host state snapshot
//! - POST `/api/control` - Apply a user control
//! - GET `/api/commands` - Collect the service calls the card sent
//! - GET `/api/devices` - Trains the editor offers
//! - POST `/api/config` - Replace the card configuration
//! - GET `/` - Preview page (serves index.html)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::config::{CardConfig, WebConfig};
use crate::state::StateSnapshot;
use crate::view::CardView;

use super::api::{
    ApiResponse, CommandResponse, CommandsResponse, ConfigResponse, ControlRequest,
    DevicesResponse, StatesResponse,
};
use super::shared::SharedCardState;

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/view - Returns the current render output
async fn get_view(State(state): State<Arc<SharedCardState>>) -> Json<ApiResponse<CardView>> {
    Json(ApiResponse::ok(state.view()))
}

/// POST /api/states - Push a host state snapshot
///
/// Accepts the host's state mapping:
/// `{"number.test_throttle": {"state": "45"}, ...}`
async fn push_states(
    State(state): State<Arc<SharedCardState>>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse<StatesResponse>>) {
    let snapshot: StateSnapshot = match serde_json::from_slice(&body) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::err(format!("Invalid state snapshot: {e}"))),
            )
        }
    };

    let entities = snapshot.len();
    let change = state.push_state(snapshot);
    debug!(entities, change = change.as_str(), "state pushed");
    (
        StatusCode::OK,
        Json(ApiResponse::ok(StatesResponse {
            change: change.as_str().to_string(),
            entities,
        })),
    )
}

/// POST /api/control - Apply a user control
///
/// Accepts JSON: `{"control": "throttle", "value": 45}`,
/// `{"control": "announcement", "key": "ready_to_roll"}`, ...
async fn apply_control(
    State(state): State<Arc<SharedCardState>>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse<CommandResponse>>) {
    let control = serde_json::from_slice::<ControlRequest>(&body)
        .map_err(anyhow::Error::from)
        .and_then(ControlRequest::into_control);

    match control {
        Ok(control) => {
            state.apply_control(control);
            (
                StatusCode::OK,
                Json(ApiResponse::ok(CommandResponse::accepted(control.name()))),
            )
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::err(format!("Invalid control request: {e}"))),
        ),
    }
}

/// GET /api/commands - Collect recorded service calls
async fn drain_commands(
    State(state): State<Arc<SharedCardState>>,
) -> Json<ApiResponse<CommandsResponse>> {
    Json(ApiResponse::ok(CommandsResponse {
        commands: state.drain_commands(),
    }))
}

/// GET /api/devices - Trains found in the last state push
async fn get_devices(
    State(state): State<Arc<SharedCardState>>,
) -> Json<ApiResponse<DevicesResponse>> {
    let (devices, options) = state.devices();
    Json(ApiResponse::ok(DevicesResponse { devices, options }))
}

/// POST /api/config - Replace the card configuration
///
/// Accepts the dashboard's card configuration: `{"device": "Polar Express", "name": ""}`
async fn set_config(
    State(state): State<Arc<SharedCardState>>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse<ConfigResponse>>) {
    let body_str = std::str::from_utf8(&body).unwrap_or("");
    let result = CardConfig::from_json(body_str).and_then(|config| {
        state.set_config(config.clone())?;
        Ok(config)
    });

    match result {
        Ok(config) => (StatusCode::OK, Json(ApiResponse::ok(config.into()))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::err(format!("{e:#}"))),
        ),
    }
}

/// GET / - Serve the preview page
async fn index() -> impl IntoResponse {
    Html(include_str!("../../www/index.html"))
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Interval of the frame loop
    pub frame_interval: Duration,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::from_config(&WebConfig::default())
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
            frame_interval: Duration::from_millis(u64::from(config.frame_interval_ms.max(1))),
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router(state: Arc<SharedCardState>, config: &WebServerConfig) -> Router {
    let mut router = Router::new()
        // API routes
        .route("/api/view", get(get_view))
        .route("/api/states", post(push_states))
        .route("/api/control", post(apply_control))
        .route("/api/commands", get(drain_commands))
        .route("/api/devices", get(get_devices))
        .route("/api/config", post(set_config))
        // Preview page
        .route("/", get(index))
        // Fallback
        .fallback(not_found)
        .with_state(state);

    // Add CORS if requested
    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Spawn the display frame loop.
///
/// Ticks every `interval`; a frame is only delivered while the card has one
/// requested, so an idle card costs one lock per tick.
pub fn spawn_frame_loop(
    state: Arc<SharedCardState>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            state.tick_frame();
        }
    })
}

/// Start the bridge with shared state
///
/// Runs the frame loop alongside the HTTP server. This function blocks until
/// the server is shut down.
pub async fn run_server(
    state: Arc<SharedCardState>,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    let frames = spawn_frame_loop(Arc::clone(&state), config.frame_interval);
    let router = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "preview bridge listening");

    let result = axum::serve(listener, router).await;
    frames.abort();
    result
}
