//! Shared API error type for the callroute server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use callroute_voice::VoiceError;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    /// The provider client was not initialized at startup.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Reported as 500: callers treat a missing provider like any
            // other server-side failure.
            ApiError::ServiceUnavailable(_) | ApiError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<VoiceError> for ApiError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Validation(msg) => ApiError::BadRequest(msg),
            VoiceError::MissingCredential => ApiError::ServiceUnavailable(err.to_string()),
            other => ApiError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::InternalServerError(msg) => msg,
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_errors_map_to_status_codes() {
        let validation: ApiError = VoiceError::Validation("empty".to_string()).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let missing: ApiError = VoiceError::MissingCredential.into();
        assert_eq!(missing.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(missing, ApiError::ServiceUnavailable(_)));

        let provider: ApiError = VoiceError::Provider {
            status: 503,
            body: "overloaded".to_string(),
        }
        .into();
        assert_eq!(provider.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(provider.to_string().contains("overloaded"));

        let parse: ApiError = VoiceError::Parse("bad".to_string()).into();
        assert_eq!(parse.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
