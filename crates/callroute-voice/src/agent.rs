use crate::client::ProviderClient;
use crate::config::ProviderConfig;
use crate::error::VoiceError;
use crate::intent::parse_classification;
use callroute_types::{ClassificationResult, ProcessingResult};
use tracing::{error, info, warn};

/// Connects to the provider and verifies the credential.
///
/// Intended to run once at process start. The caller keeps the result and
/// hands it to request handlers; nothing is stored globally.
pub async fn initialize(config: ProviderConfig) -> Result<VoiceAgent, VoiceError> {
    let client = ProviderClient::new(config)?;
    info!(
        base_url = %client.config().base_url,
        key = %client.config().key_hint(),
        "initializing provider client"
    );
    client.verify().await?;
    info!("provider connection verified");
    Ok(VoiceAgent::new(client))
}

/// Runs the per-call transcribe → classify → synthesize sequence.
///
/// Each step is one provider request, awaited in order. The agent holds no
/// per-call state and can serve any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct VoiceAgent {
    client: ProviderClient,
}

impl VoiceAgent {
    pub fn new(client: ProviderClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ProviderClient {
        &self.client
    }

    /// Transcribes caller audio. Errors are returned as-is; nothing retries.
    pub async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String, VoiceError> {
        self.client.transcribe(audio, file_name).await
    }

    /// Classifies a transcript with the pipeline's chat model.
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult, VoiceError> {
        self.classify_with_model(text, &self.client.config().chat_model)
            .await
    }

    /// Classifies `text` with an explicit model.
    ///
    /// An unparseable or empty reply yields [`ClassificationResult::fallback`];
    /// only transport, HTTP status and credential failures are returned.
    pub async fn classify_with_model(
        &self,
        text: &str,
        model: &str,
    ) -> Result<ClassificationResult, VoiceError> {
        let raw = match self.client.complete_classification(text, model).await {
            Ok(raw) => raw,
            Err(VoiceError::Parse(reason)) => {
                warn!(%reason, "classification reply has no usable content, using fallback");
                return Ok(ClassificationResult::fallback());
            }
            Err(e) => return Err(e),
        };
        tracing::debug!(model, reply = %raw, "classification reply");

        match parse_classification(&raw) {
            Ok(classification) => Ok(classification),
            Err(e) => {
                warn!(error = %e, "unparseable classification reply, using fallback");
                Ok(ClassificationResult::fallback())
            }
        }
    }

    /// Synthesizes `text` with the configured voice.
    ///
    /// Returns `None` on any failure; the caller decides whether missing
    /// audio is fatal.
    pub async fn synthesize(&self, text: &str) -> Option<Vec<u8>> {
        let options = self.client.default_speech_options();
        match self.client.synthesize(text, &options).await {
            Ok(audio) => {
                info!(bytes = audio.len(), format = %options.format, "synthesized reply audio");
                Some(audio)
            }
            Err(e) => {
                warn!(error = %e, "speech synthesis failed");
                None
            }
        }
    }

    /// Processes one caller recording end to end.
    ///
    /// A failed transcription (or a classifier that cannot be reached)
    /// returns [`ProcessingResult::failed`]. A synthesis failure keeps the
    /// transcript and classification and reports the audio as unavailable.
    pub async fn run_voice_pipeline(&self, audio: &[u8], file_name: &str) -> ProcessingResult {
        let transcript = match self.transcribe(audio, file_name).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, bytes = audio.len(), "transcription failed");
                return ProcessingResult::failed();
            }
        };
        info!(transcript = %transcript, "transcribed caller audio");

        let classification = match self.classify(&transcript).await {
            Ok(classification) => classification,
            Err(e) => {
                error!(error = %e, "classification request failed");
                return ProcessingResult::failed();
            }
        };
        info!(
            intent = %classification.intent,
            confidence = classification.confidence,
            "classified caller intent"
        );

        let audio = self.synthesize(&classification.reply_text).await;
        ProcessingResult::completed(transcript, classification, audio)
    }
}
