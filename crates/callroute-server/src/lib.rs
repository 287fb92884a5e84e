//! callroute server library logic.
//!
//! HTTP front for the voice relay. Handlers receive caller audio or text,
//! delegate to the [`VoiceAgent`], and reshape its output into routing
//! responses for the telephony system.

pub mod api;
pub mod api_audio;
pub mod api_intent;
pub mod api_speak;
pub mod config;

use api::ApiError;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use callroute_voice::{VoiceAgent, VoiceError, PROVIDER_TAG};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Maximum request body size for JSON endpoints (1 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Maximum request body size for audio uploads. The provider accepts 25 MiB
/// of audio; the extra mebibyte covers multipart framing.
const MAX_AUDIO_BODY_BYTES: usize = 26 * 1024 * 1024;

/// Outcome of the provider check performed at startup.
#[derive(Debug, Clone)]
pub enum ProviderStatus {
    Connected(Arc<VoiceAgent>),
    Disconnected { reason: String },
}

impl ProviderStatus {
    pub fn from_init(result: Result<VoiceAgent, VoiceError>) -> Self {
        match result {
            Ok(agent) => ProviderStatus::Connected(Arc::new(agent)),
            Err(e) => ProviderStatus::Disconnected {
                reason: e.to_string(),
            },
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ProviderStatus::Connected(_))
    }
}

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Provider client, if startup initialization succeeded.
    pub provider: ProviderStatus,
}

impl AppState {
    pub fn new(provider: ProviderStatus) -> Self {
        Self { provider }
    }

    /// Returns the agent or the error every provider-backed endpoint reports
    /// when startup initialization failed.
    pub fn require_agent(&self) -> Result<&VoiceAgent, ApiError> {
        match &self.provider {
            ProviderStatus::Connected(agent) => Ok(agent.as_ref()),
            ProviderStatus::Disconnected { reason } => Err(ApiError::ServiceUnavailable(
                format!("provider client not available: {}", reason),
            )),
        }
    }
}

/// Health check handler.
///
/// Reports the result of the startup provider check; no live re-check.
async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let client_status = if state.provider.is_connected() {
        "connected"
    } else {
        "disconnected"
    };

    Json(json!({
        "status": "healthy",
        "provider": PROVIDER_TAG,
        "client_status": client_status,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let audio_routes = Router::new()
        .route("/process_audio", post(api_audio::process_audio_handler))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BODY_BYTES));

    let json_routes = Router::new()
        .route("/text_intent", post(api_intent::text_intent_handler))
        .route("/speak", post(api_speak::speak_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES));

    Router::new()
        .route("/health", get(health))
        .merge(audio_routes)
        .merge(json_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([axum::http::HeaderName::from_static(
                    api_audio::AGENT_DATA_HEADER,
                )]),
        )
        .layer(Extension(Arc::new(state)))
}
