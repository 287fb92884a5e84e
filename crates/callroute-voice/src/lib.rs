//! Speech and language provider integration for callroute.
//!
//! Wraps an OpenAI-compatible HTTP API: Whisper-style transcription,
//! chat-completion intent classification, and speech synthesis. On top of
//! the raw client sits the [`VoiceAgent`], which runs the per-call
//! transcribe → classify → synthesize sequence and owns the degradation
//! policy for each step.
//!
//! The provider is opaque. Every call is a single request/response exchange
//! with an explicit timeout and no retry.

pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod intent;
pub mod stt;
pub mod tts;

pub use agent::{initialize, VoiceAgent};
pub use client::ProviderClient;
pub use config::{ProviderConfig, API_KEY_ENV, PROVIDER_TAG};
pub use error::VoiceError;
pub use intent::{parse_classification, SYSTEM_PROMPT};
pub use tts::{content_type_for_format, SpeechOptions};
