use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL of the hosted OpenAI API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Provider tag reported in every response payload.
pub const PROVIDER_TAG: &str = "openai";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_language() -> String {
    "el".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_text_intent_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_tts_voice() -> String {
    "alloy".to_string()
}

fn default_tts_format() -> String {
    "mp3".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Connection and model settings for the remote provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API root, e.g. `https://api.openai.com/v1`. Endpoint paths are appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer credential. Normally supplied through [`API_KEY_ENV`].
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
    /// ISO-639-1 language the callers speak.
    #[serde(default = "default_language")]
    pub language: String,
    /// Model used to classify transcribed caller audio.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Model used by the text-only intent endpoint.
    #[serde(default = "default_text_intent_model")]
    pub text_intent_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    #[serde(default = "default_tts_voice")]
    pub tts_voice: String,
    #[serde(default = "default_tts_format")]
    pub tts_format: String,
    /// Upper bound for a whole provider request, body included.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            transcription_model: default_transcription_model(),
            language: default_language(),
            chat_model: default_chat_model(),
            text_intent_model: default_text_intent_model(),
            temperature: default_temperature(),
            tts_model: default_tts_model(),
            tts_voice: default_tts_voice(),
            tts_format: default_tts_format(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("transcription_model", &self.transcription_model)
            .field("language", &self.language)
            .field("chat_model", &self.chat_model)
            .field("text_intent_model", &self.text_intent_model)
            .field("temperature", &self.temperature)
            .field("tts_model", &self.tts_model)
            .field("tts_voice", &self.tts_voice)
            .field("tts_format", &self.tts_format)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// First eight characters of the key, safe to log.
    pub fn key_hint(&self) -> String {
        let prefix: String = self.api_key.chars().take(8).collect();
        format!("{}...", prefix)
    }
}
