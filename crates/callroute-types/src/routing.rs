//! Routing decisions consumed by the telephony side.

use crate::{ClassificationResult, Intent};
use serde::{Deserialize, Serialize};

/// Confidence above which a call is routed with normal priority.
///
/// The comparison is strict: a confidence of exactly this value is `Low`.
pub const NORMAL_PRIORITY_THRESHOLD: f64 = 0.7;

/// Queue priority for the transferred call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    Low,
}

impl Priority {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > NORMAL_PRIORITY_THRESHOLD {
            Priority::Normal
        } else {
            Priority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

/// Caller details gathered during classification.
///
/// Serializes to `{}` when nothing was collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_name: Option<String>,
}

impl CollectedData {
    pub fn is_empty(&self) -> bool {
        self.caller_name.is_none()
    }
}

/// Department/priority bundle handed to the call router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub department: Intent,
    pub priority: Priority,
    pub collected_data: CollectedData,
    pub confidence: f64,
}

impl RoutingDecision {
    pub fn from_classification(classification: &ClassificationResult) -> Self {
        Self {
            department: classification.intent,
            priority: Priority::from_confidence(classification.confidence),
            collected_data: CollectedData {
                caller_name: classification.caller_name.clone(),
            },
            confidence: classification.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classification(confidence: f64, caller_name: Option<&str>) -> ClassificationResult {
        ClassificationResult {
            intent: Intent::Sales,
            confidence,
            reply_text: "ok".to_string(),
            caller_name: caller_name.map(str::to_string),
        }
    }

    #[test]
    fn priority_threshold_is_strict() {
        assert_eq!(Priority::from_confidence(0.7), Priority::Low);
        assert_eq!(Priority::from_confidence(0.70001), Priority::Normal);
        assert_eq!(Priority::from_confidence(0.69), Priority::Low);
    }

    #[test]
    fn priority_over_unit_interval() {
        for step in 0..=100 {
            let confidence = step as f64 / 100.0;
            let expected = if confidence > 0.7 {
                Priority::Normal
            } else {
                Priority::Low
            };
            assert_eq!(Priority::from_confidence(confidence), expected, "{confidence}");
        }
    }

    #[test]
    fn collected_data_tracks_caller_name() {
        let without = RoutingDecision::from_classification(&classification(0.9, None));
        assert!(without.collected_data.is_empty());
        assert_eq!(serde_json::to_value(&without.collected_data).unwrap(), json!({}));

        let with = RoutingDecision::from_classification(&classification(0.9, Some("Νίκος")));
        assert!(!with.collected_data.is_empty());
        assert_eq!(
            serde_json::to_value(&with.collected_data).unwrap(),
            json!({"caller_name": "Νίκος"})
        );
    }

    #[test]
    fn routing_decision_wire_shape() {
        let decision = RoutingDecision::from_classification(&ClassificationResult {
            intent: Intent::TechSupport,
            confidence: 0.9,
            reply_text: "Θα σας συνδέσω με την τεχνική υποστήριξη.".to_string(),
            caller_name: None,
        });

        assert_eq!(
            serde_json::to_value(&decision).unwrap(),
            json!({
                "department": "tech_support",
                "priority": "normal",
                "collected_data": {},
                "confidence": 0.9
            })
        );
    }
}
