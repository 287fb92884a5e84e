//! Direct text-to-speech endpoint.

use crate::{api::ApiError, AppState};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
    pub model: Option<String>,
    pub format: Option<String>,
}

/// Handler for `POST /speak`.
///
/// Validates the text before touching the provider, so a bad request never
/// costs a remote call.
pub async fn speak_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<SpeakRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload
        .map_err(|e| ApiError::BadRequest(format!("invalid request body: {}", e.body_text())))?;

    let text = match request.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ApiError::BadRequest("text is required".to_string())),
    };

    let agent = state.require_agent()?;
    let client = agent.client();
    let options =
        client
            .default_speech_options()
            .with_overrides(request.voice, request.model, request.format);

    let audio = client.synthesize(&text, &options).await.map_err(|e| {
        tracing::error!(error = %e, voice = %options.voice, "speak synthesis failed");
        ApiError::from(e)
    })?;

    tracing::info!(
        bytes = audio.len(),
        voice = %options.voice,
        format = %options.format,
        "synthesized speech"
    );

    let mut response = audio.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(options.content_type()),
    );
    Ok(response)
}
