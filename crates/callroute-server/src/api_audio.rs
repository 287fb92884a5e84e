//! Audio-in / audio-out endpoint.
//!
//! `POST /process_audio` accepts one caller recording as multipart field
//! `audio`, runs the voice pipeline, and answers with the synthesized reply.
//! The transcript, classification and routing decision travel alongside the
//! audio in the `x-agent-data` header so the telephony side can route the
//! call without parsing the body.

use crate::{api::ApiError, AppState};
use axum::{
    extract::{Extension, Multipart},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use callroute_types::{Intent, PipelineOutcome, ProcessingResult, RoutingDecision};
use callroute_voice::PROVIDER_TAG;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Response header carrying the [`AgentMetadata`] JSON.
pub const AGENT_DATA_HEADER: &str = "x-agent-data";

/// Multipart field holding the recording.
const AUDIO_FIELD: &str = "audio";

/// File name sent to the provider when the upload has no usable one.
const DEFAULT_FILE_NAME: &str = "audio.wav";

/// A validated caller recording.
#[derive(Debug)]
struct AudioUpload {
    file_name: String,
    data: Vec<u8>,
}

/// Side-channel description of a processed call.
#[derive(Debug, Serialize)]
pub struct AgentMetadata<'a> {
    pub transcribed_text: &'a str,
    pub intent: Intent,
    pub response_text: &'a str,
    pub name: Option<&'a str>,
    pub timestamp: String,
    pub routing_info: RoutingDecision,
    pub confidence: f64,
    pub provider: &'static str,
}

impl<'a> AgentMetadata<'a> {
    pub fn from_result(result: &'a ProcessingResult, now: DateTime<Utc>) -> Self {
        let classification = &result.classification;
        Self {
            transcribed_text: &result.transcribed_text,
            intent: classification.intent,
            response_text: &classification.reply_text,
            name: classification.caller_name.as_deref(),
            timestamp: now.to_rfc3339(),
            routing_info: result.routing(),
            confidence: classification.confidence,
            provider: PROVIDER_TAG,
        }
    }

    /// Serializes to JSON that is safe to place in an HTTP header.
    pub fn to_header_value(&self) -> Result<HeaderValue, ApiError> {
        let json = serde_json::to_string(self).map_err(|e| {
            ApiError::InternalServerError(format!("failed to encode agent metadata: {}", e))
        })?;
        HeaderValue::from_str(&escape_non_ascii(&json)).map_err(|e| {
            ApiError::InternalServerError(format!("invalid agent metadata header: {}", e))
        })
    }
}

/// Replaces every non-ASCII character, and DEL, with its `\uXXXX` JSON
/// escape.
///
/// Input must already be serialized JSON: these characters can then only
/// occur inside string literals, where the escape is equivalent.
pub fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for ch in json.chars() {
        if ch.is_ascii() && ch != '\u{7f}' {
            out.push(ch);
        } else {
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// Keeps the base name of an uploaded file, or falls back to
/// [`DEFAULT_FILE_NAME`] when nothing with an extension remains.
fn sanitize_file_name(name: Option<&str>) -> String {
    let base = name
        .and_then(|n| n.rsplit(|c| c == '/' || c == '\\').next())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    match cleaned.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => cleaned,
        _ => DEFAULT_FILE_NAME.to_string(),
    }
}

async fn read_audio_upload(multipart: &mut Multipart) -> Result<AudioUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart error: {}", e)))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = sanitize_file_name(field.file_name());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read audio upload: {}", e)))?;

        if data.is_empty() {
            return Err(ApiError::BadRequest("audio upload is empty".to_string()));
        }

        return Ok(AudioUpload {
            file_name,
            data: data.to_vec(),
        });
    }

    Err(ApiError::BadRequest(format!(
        "missing '{}' file field",
        AUDIO_FIELD
    )))
}

/// Handler for `POST /process_audio`.
///
/// Returns the synthesized reply audio. Any outcome without audio is a 500.
pub async fn process_audio_handler(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_audio_upload(&mut multipart).await?;
    let agent = state.require_agent()?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("process_audio", %request_id);
    tracing::info!(
        parent: &span,
        bytes = upload.data.len(),
        file_name = %upload.file_name,
        "processing caller audio"
    );

    let result = agent
        .run_voice_pipeline(&upload.data, &upload.file_name)
        .instrument(span.clone())
        .await;
    drop(upload);

    let now = Utc::now();
    let metadata = AgentMetadata::from_result(&result, now);
    let header_value = metadata.to_header_value()?;

    let audio = match (&result.outcome, result.synthesized_audio.as_ref()) {
        (PipelineOutcome::Synthesized, Some(audio)) => audio.clone(),
        (PipelineOutcome::Failed, _) => {
            tracing::error!(parent: &span, "voice pipeline failed before synthesis");
            return Err(ApiError::InternalServerError(
                "failed to process audio: transcription failed".to_string(),
            ));
        }
        _ => {
            tracing::error!(
                parent: &span,
                intent = %result.classification.intent,
                "no reply audio was synthesized"
            );
            return Err(ApiError::InternalServerError(
                "TTS failed to generate audio".to_string(),
            ));
        }
    };

    let options = agent.client().default_speech_options();
    let file_name = format!("response_{}.{}", now.format("%Y%m%d_%H%M%S"), options.format);
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
        .map_err(|e| ApiError::InternalServerError(format!("invalid file name: {}", e)))?;

    tracing::info!(
        parent: &span,
        bytes = audio.len(),
        intent = %result.classification.intent,
        priority = metadata.routing_info.priority.as_str(),
        "returning reply audio"
    );

    let mut response = audio.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(options.content_type()),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(AGENT_DATA_HEADER, header_value);
    Ok(response)
}
