use thiserror::Error;

/// Failure of a single provider call.
///
/// Each variant maps to a different handling policy: transport and provider
/// failures are fatal on audio endpoints, parse failures are always absorbed
/// into a fallback, and validation failures never reach the provider.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("provider credential is not configured (set OPENAI_API_KEY)")]
    MissingCredential,

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("unexpected provider reply: {0}")]
    Parse(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl VoiceError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, VoiceError::Transport(e) if e.is_timeout())
    }
}
