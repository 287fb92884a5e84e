use crate::client::{check_status, ProviderClient};
use crate::config::ProviderConfig;
use crate::error::VoiceError;
use serde::Serialize;

/// Maximum text input length for synthesis, in characters.
pub const MAX_TTS_INPUT_CHARS: usize = 4096;

/// Voice, model and container used for one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechOptions {
    pub voice: String,
    pub model: String,
    pub format: String,
}

impl SpeechOptions {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            voice: config.tts_voice.clone(),
            model: config.tts_model.clone(),
            format: config.tts_format.clone(),
        }
    }

    /// Replaces each default with the caller's selector when one is given.
    pub fn with_overrides(
        mut self,
        voice: Option<String>,
        model: Option<String>,
        format: Option<String>,
    ) -> Self {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        if let Some(voice) = non_blank(voice) {
            self.voice = voice;
        }
        if let Some(model) = non_blank(model) {
            self.model = model;
        }
        if let Some(format) = non_blank(format) {
            self.format = format;
        }
        self
    }

    pub fn content_type(&self) -> &'static str {
        content_type_for_format(&self.format)
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// Maps a synthesis `response_format` to the HTTP content type of the audio.
pub fn content_type_for_format(format: &str) -> &'static str {
    match format.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "opus" => "audio/ogg",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "pcm" => "audio/pcm",
        _ => "application/octet-stream",
    }
}

impl ProviderClient {
    pub fn default_speech_options(&self) -> SpeechOptions {
        SpeechOptions::from_config(self.config())
    }

    /// Synthesizes `text` and returns the encoded audio.
    ///
    /// An empty reply body is an error, never zero-length audio.
    pub async fn synthesize(
        &self,
        text: &str,
        options: &SpeechOptions,
    ) -> Result<Vec<u8>, VoiceError> {
        if text.trim().is_empty() {
            return Err(VoiceError::Validation("text to synthesize is empty".to_string()));
        }
        let chars = text.chars().count();
        if chars > MAX_TTS_INPUT_CHARS {
            return Err(VoiceError::Validation(format!(
                "text exceeds maximum length: {} characters (limit: {} characters)",
                chars, MAX_TTS_INPUT_CHARS
            )));
        }

        let request = SpeechRequest {
            model: &options.model,
            input: text,
            voice: &options.voice,
            response_format: &options.format,
        };

        let response = self.post("audio/speech").json(&request).send().await?;
        let response = check_status(response).await?;
        let audio = response.bytes().await?;

        if audio.is_empty() {
            return Err(VoiceError::Parse(
                "provider returned an empty audio body".to_string(),
            ));
        }

        Ok(audio.to_vec())
    }
}
