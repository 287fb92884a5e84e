//! Result of one pass through the voice pipeline.

use crate::{ClassificationResult, RoutingDecision, FAILED_TRANSCRIPT};
use serde::{Deserialize, Serialize};

/// Terminal state of a voice pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// Transcribed, classified and synthesized.
    Synthesized,
    /// Transcript and classification are valid but synthesis produced no audio.
    AudioUnavailable,
    /// Transcription (or the classification call) failed; nothing upstream is usable.
    Failed,
}

/// Everything produced while handling one audio request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub transcribed_text: String,
    pub classification: ClassificationResult,
    pub synthesized_audio: Option<Vec<u8>>,
    pub outcome: PipelineOutcome,
}

impl ProcessingResult {
    /// Builds a result from a completed transcription and classification.
    ///
    /// Empty audio is treated the same as missing audio.
    pub fn completed(
        transcribed_text: String,
        classification: ClassificationResult,
        synthesized_audio: Option<Vec<u8>>,
    ) -> Self {
        let synthesized_audio = synthesized_audio.filter(|audio| !audio.is_empty());
        let outcome = if synthesized_audio.is_some() {
            PipelineOutcome::Synthesized
        } else {
            PipelineOutcome::AudioUnavailable
        };
        Self {
            transcribed_text,
            classification,
            synthesized_audio,
            outcome,
        }
    }

    /// The fixed result returned when the pipeline fails early.
    pub fn failed() -> Self {
        Self {
            transcribed_text: FAILED_TRANSCRIPT.to_string(),
            classification: ClassificationResult::failed(),
            synthesized_audio: None,
            outcome: PipelineOutcome::Failed,
        }
    }

    pub fn routing(&self) -> RoutingDecision {
        self.classification.routing()
    }
}
