//! Text-only intent classification.
//!
//! `POST /text_intent` classifies a transcript that was produced elsewhere.
//! It always answers 200 with a complete payload: on any failure the caller
//! gets the reception fallback plus an `error` field.

use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use callroute_types::{ClassificationResult, Intent, DEFAULT_REPLY};
use callroute_voice::PROVIDER_TAG;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct TextIntentRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TextIntentResponse {
    pub text: String,
    pub intent: Intent,
    pub name: Option<String>,
    pub response: String,
    pub confidence: f64,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TextIntentResponse {
    fn classified(text: String, classification: ClassificationResult) -> Self {
        Self {
            text,
            intent: classification.intent,
            name: classification.caller_name,
            response: classification.reply_text,
            confidence: classification.confidence,
            provider: PROVIDER_TAG.to_string(),
            error: None,
        }
    }

    fn fallback(text: String, error: String) -> Self {
        Self {
            text,
            intent: Intent::General,
            name: None,
            response: DEFAULT_REPLY.to_string(),
            confidence: 0.0,
            provider: PROVIDER_TAG.to_string(),
            error: Some(error),
        }
    }
}

/// Handler for `POST /text_intent`.
pub async fn text_intent_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<TextIntentRequest>, JsonRejection>,
) -> Json<TextIntentResponse> {
    let text = match payload {
        Ok(Json(request)) => request.text,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "unreadable text_intent body");
            return Json(TextIntentResponse::fallback(
                String::new(),
                format!("invalid request body: {}", rejection.body_text()),
            ));
        }
    };

    if text.trim().is_empty() {
        return Json(TextIntentResponse::fallback(
            text,
            "text is required".to_string(),
        ));
    }

    let agent = match state.require_agent() {
        Ok(agent) => agent,
        Err(e) => {
            tracing::error!(error = %e, "text_intent without provider");
            return Json(TextIntentResponse::fallback(text, e.to_string()));
        }
    };

    let model = &agent.client().config().text_intent_model;
    match agent.classify_with_model(&text, model).await {
        Ok(classification) => {
            tracing::info!(
                intent = %classification.intent,
                confidence = classification.confidence,
                "classified text"
            );
            Json(TextIntentResponse::classified(text, classification))
        }
        Err(e) => {
            tracing::error!(error = %e, "text classification failed");
            Json(TextIntentResponse::fallback(text, e.to_string()))
        }
    }
}
