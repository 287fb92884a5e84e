//! Core types for the callroute relay.
//!
//! This crate defines the data that flows through a single call-routing
//! request: the caller [`Intent`], the [`ClassificationResult`] parsed from
//! the language provider, the [`RoutingDecision`] handed to the telephony
//! system, and the per-request [`ProcessingResult`].
//!
//! Nothing here performs I/O. Every value is created and dropped within one
//! request; no type carries an identity beyond that.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

mod pipeline;
mod routing;

pub use pipeline::{PipelineOutcome, ProcessingResult};
pub use routing::{CollectedData, Priority, RoutingDecision, NORMAL_PRIORITY_THRESHOLD};

/// Confidence assigned when the provider reply cannot be parsed.
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Confidence assumed when a well-formed reply omits the `confidence` field.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Reply spoken to the caller when the provider reply cannot be parsed.
pub const FALLBACK_REPLY: &str = "Θα σας συνδέσω με την υποδοχή μας.";

/// Reply used when a well-formed reply omits `response`, and by the
/// text-intent endpoint when the provider call itself fails.
pub const DEFAULT_REPLY: &str = "Θα σας συνδέσω με την υποδοχή.";

/// Reply used when the voice pipeline fails before a transcript exists.
pub const APOLOGY_REPLY: &str =
    "Λυπάμαι, δεν μπόρεσα να σας κατανοήσω. Θα σας συνδέσω με την υποδοχή.";

/// Transcript placeholder for a failed voice pipeline.
pub const FAILED_TRANSCRIPT: &str = "Error in processing";

/// Routing category assigned to a caller utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Computers, servers, networks.
    TechSupport,
    /// Purchases, quotes, new equipment.
    Sales,
    /// Invoices and payments.
    Accounting,
    /// Opening hours, address, anything else. Routed to reception.
    #[default]
    General,
}

impl Intent {
    /// All intents, in prompt order.
    pub const ALL: [Intent; 4] = [
        Intent::TechSupport,
        Intent::Sales,
        Intent::Accounting,
        Intent::General,
    ];

    /// Returns the wire label of the intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::TechSupport => "tech_support",
            Intent::Sales => "sales",
            Intent::Accounting => "accounting",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label does not name one of the four intents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown intent: {0}")]
pub struct UnknownIntent(pub String);

impl FromStr for Intent {
    type Err = UnknownIntent;

    /// Parses a label case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase();
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == label)
            .ok_or_else(|| UnknownIntent(s.to_string()))
    }
}

/// The classifier's verdict on one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: Intent,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    /// Short transfer phrase to speak back to the caller.
    pub reply_text: String,
    pub caller_name: Option<String>,
}

impl ClassificationResult {
    /// The safe default used when the provider reply is not parseable.
    pub fn fallback() -> Self {
        Self {
            intent: Intent::General,
            confidence: FALLBACK_CONFIDENCE,
            reply_text: FALLBACK_REPLY.to_string(),
            caller_name: None,
        }
    }

    /// The classification reported when the pipeline failed before a
    /// transcript existed.
    pub fn failed() -> Self {
        Self {
            intent: Intent::General,
            confidence: 0.0,
            reply_text: APOLOGY_REPLY.to_string(),
            caller_name: None,
        }
    }

    /// Derives the routing decision for this classification.
    pub fn routing(&self) -> RoutingDecision {
        RoutingDecision::from_classification(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_labels() {
        assert_eq!(Intent::TechSupport.as_str(), "tech_support");
        assert_eq!(Intent::Sales.as_str(), "sales");
        assert_eq!(Intent::Accounting.as_str(), "accounting");
        assert_eq!(Intent::General.as_str(), "general");
    }

    #[test]
    fn intent_parses_case_insensitively() {
        assert_eq!("tech_support".parse::<Intent>(), Ok(Intent::TechSupport));
        assert_eq!(" SALES ".parse::<Intent>(), Ok(Intent::Sales));
        assert_eq!("Accounting".parse::<Intent>(), Ok(Intent::Accounting));
    }

    #[test]
    fn intent_rejects_unknown_labels() {
        let err = "billing".parse::<Intent>().unwrap_err();
        assert_eq!(err, UnknownIntent("billing".to_string()));
        assert!("".parse::<Intent>().is_err());
    }

    #[test]
    fn intent_serializes_snake_case() {
        let json = serde_json::to_string(&Intent::TechSupport).unwrap();
        assert_eq!(json, "\"tech_support\"");
        let back: Intent = serde_json::from_str("\"accounting\"").unwrap();
        assert_eq!(back, Intent::Accounting);
    }

    #[test]
    fn fallback_classification() {
        let fallback = ClassificationResult::fallback();
        assert_eq!(fallback.intent, Intent::General);
        assert_eq!(fallback.confidence, 0.3);
        assert_eq!(fallback.reply_text, FALLBACK_REPLY);
        assert_eq!(fallback.caller_name, None);
    }

    #[test]
    fn failed_classification_has_zero_confidence() {
        let failed = ClassificationResult::failed();
        assert_eq!(failed.intent, Intent::General);
        assert_eq!(failed.confidence, 0.0);
        assert_eq!(failed.reply_text, APOLOGY_REPLY);
    }
}
