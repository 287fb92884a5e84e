use crate::config::ProviderConfig;
use crate::error::VoiceError;
use std::sync::Arc;
use std::time::Duration;

/// Longest provider error body kept in a [`VoiceError::Provider`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Authenticated HTTP client for the remote provider.
///
/// Cheap to clone: the underlying `reqwest::Client` pools connections and the
/// config is shared.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    config: Arc<ProviderConfig>,
}

impl ProviderClient {
    /// Builds a client with the configured timeouts.
    ///
    /// Fails with [`VoiceError::MissingCredential`] when no API key is set;
    /// no request is made.
    pub fn new(config: ProviderConfig) -> Result<Self, VoiceError> {
        if !config.has_api_key() {
            return Err(VoiceError::MissingCredential);
        }
        if config.base_url.trim().is_empty() {
            return Err(VoiceError::Config("provider base_url is empty".to_string()));
        }
        if config.request_timeout_secs == 0 {
            return Err(VoiceError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs.max(1)))
            .user_agent(concat!("callroute/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VoiceError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(self.endpoint(path))
            .bearer_auth(&self.config.api_key)
    }

    /// Checks the credential by listing models.
    ///
    /// Called once at startup; the outcome is not re-checked afterwards.
    pub async fn verify(&self) -> Result<(), VoiceError> {
        let response = self
            .http
            .get(self.endpoint("models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turns a non-2xx reply into [`VoiceError::Provider`].
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, VoiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body = if body.chars().count() > MAX_ERROR_BODY_CHARS {
        let mut truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        truncated.push_str("...");
        truncated
    } else {
        body
    };

    Err(VoiceError::Provider {
        status: status.as_u16(),
        body,
    })
}
