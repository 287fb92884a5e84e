use crate::client::{check_status, ProviderClient};
use crate::error::VoiceError;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Maximum audio input size for transcription (25 MiB, the provider's own
/// upload limit).
pub const MAX_STT_INPUT_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl ProviderClient {
    /// Transcribes an audio file in the configured caller language.
    ///
    /// `file_name` is forwarded so the provider can infer the container
    /// format from its extension.
    pub async fn transcribe(&self, audio_data: &[u8], file_name: &str) -> Result<String, VoiceError> {
        if audio_data.is_empty() {
            return Err(VoiceError::Validation("audio payload is empty".to_string()));
        }
        if audio_data.len() > MAX_STT_INPUT_BYTES {
            return Err(VoiceError::Validation(format!(
                "audio data exceeds maximum size: {} bytes (limit: {} bytes)",
                audio_data.len(),
                MAX_STT_INPUT_BYTES
            )));
        }

        let config = self.config();
        let part = Part::bytes(audio_data.to_vec()).file_name(file_name.to_string());
        let form = Form::new()
            .text("model", config.transcription_model.clone())
            .text("language", config.language.clone())
            .part("file", part);

        let response = self
            .post("audio/transcriptions")
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Parse(format!("transcription reply: {}", e)))?;

        Ok(body.text.trim().to_string())
    }
}
