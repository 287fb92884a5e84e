//! Intent classification through the chat-completion endpoint.
//!
//! The model is instructed to answer with a small JSON object
//! (`intent`, `confidence`, `response`, `name`). [`parse_classification`]
//! turns that reply into a [`ClassificationResult`] and reports anything it
//! cannot use as [`VoiceError::Parse`]; deciding what to do about a parse
//! failure is left to the caller.

use crate::client::{check_status, ProviderClient};
use crate::error::VoiceError;
use callroute_types::{ClassificationResult, Intent, DEFAULT_CONFIDENCE, DEFAULT_REPLY};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Instructions sent ahead of every caller utterance.
pub const SYSTEM_PROMPT: &str = r#"
Είσαι ένας φιλικός voice agent για μια εταιρεία πληροφορικής στην Ελλάδα.
Η δουλειά σου είναι να κατανοήσεις τι θέλει ο πελάτης και να τον κατηγοριοποιήσεις.

ΠΡΟΣΟΧΗ: ΠΑΝΤΑ απαντάς στα ΕΛΛΗΝΙΚΑ, ακόμα και αν η φράση περιέχει αγγλικές λέξεις ή όρους.

Κατηγορίες:
- tech_support: τεχνική υποστήριξη, προβλήματα υπολογιστών, servers, δικτύων
- sales: πωλήσεις, αγορές, προσφορές, νέος εξοπλισμός
- accounting: λογιστήριο, τιμολόγια, πληρωμές
- general: γενικές πληροφορίες, ωράριο, διεύθυνση

ΣΗΜΑΝΤΙΚΟ: Δώσε ΜΟΝΟ σύντομη απάντηση μεταφοράς. ΜΗΝ κάνεις επιπλέον ερωτήσεις.

Απάντησε ΠΑΝΤΑ σε JSON format:
{
  "intent": "κατηγορία",
  "confidence": 0.9,
  "response": "Σύντομη φιλική απάντηση μεταφοράς (μόνο 1-2 προτάσεις)",
  "name": "όνομα αν αναφέρθηκε ή null"
}

Παραδείγματα απαντήσεων:
- tech_support: "Θα σας συνδέσω με την τεχνική υποστήριξη. Παρακαλώ περιμένετε."
- sales: "Θα σας μεταφέρω στο τμήμα πωλήσεων. Ένα λεπτό παρακαλώ."
- accounting: "Σας συνδέω με το λογιστήριο μας. Περιμένετε λίγο."
- general: "Θα σας συνδέσω με την υποδοχή μας. Παρακαλώ περιμένετε."
"#;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Wraps the caller's words the way the prompt expects them.
pub fn user_message(text: &str) -> String {
    format!("Πελάτης είπε: '{}'", text)
}

impl ProviderClient {
    /// Sends `text` to the classifier and returns the raw reply content.
    pub async fn complete_classification(
        &self,
        text: &str,
        model: &str,
    ) -> Result<String, VoiceError> {
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_message(text),
                },
            ],
            temperature: self.config().temperature,
        };

        let response = self
            .post("chat/completions")
            .json(&request)
            .send()
            .await?;
        let response = check_status(response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Parse(format!("chat completion reply: {}", e)))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| VoiceError::Parse("no choices in chat completion reply".to_string()))?;
        choice.message.content.ok_or_else(|| {
            VoiceError::Parse("chat completion reply has no message content".to_string())
        })
    }
}

/// Parses the classifier's reply.
///
/// Missing fields take their documented defaults, unknown intent labels
/// route to [`Intent::General`], and confidence is clamped to `[0, 1]`.
/// Anything that is not a JSON object, or whose fields have the wrong type,
/// is a [`VoiceError::Parse`].
pub fn parse_classification(raw: &str) -> Result<ClassificationResult, VoiceError> {
    let body = strip_code_fence(raw);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| VoiceError::Parse(format!("classification is not valid JSON: {}", e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| VoiceError::Parse("classification is not a JSON object".to_string()))?;

    let intent = match object.get("intent") {
        None | Some(Value::Null) => Intent::General,
        Some(Value::String(label)) => label.parse().unwrap_or_else(|_| {
            tracing::warn!(label = %label, "unknown intent label, routing to general");
            Intent::General
        }),
        Some(other) => {
            return Err(VoiceError::Parse(format!(
                "intent is not a string: {}",
                other
            )))
        }
    };

    let confidence = match object.get("confidence") {
        None | Some(Value::Null) => DEFAULT_CONFIDENCE,
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| VoiceError::Parse(format!("confidence out of range: {}", n)))?,
        Some(other) => {
            return Err(VoiceError::Parse(format!(
                "confidence is not a number: {}",
                other
            )))
        }
    };

    let reply_text = match object.get("response") {
        None | Some(Value::Null) => DEFAULT_REPLY.to_string(),
        Some(Value::String(text)) if text.trim().is_empty() => DEFAULT_REPLY.to_string(),
        Some(Value::String(text)) => text.trim().to_string(),
        Some(other) => {
            return Err(VoiceError::Parse(format!(
                "response is not a string: {}",
                other
            )))
        }
    };

    let caller_name = match object.get("name") {
        Some(Value::String(name)) => normalize_name(name),
        _ => None,
    };

    Ok(ClassificationResult {
        intent,
        confidence: confidence.clamp(0.0, 1.0),
        reply_text,
        caller_name,
    })
}

/// The model sometimes writes the string "null" instead of JSON null.
fn normalize_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(name.to_string())
    }
}

/// Unwraps a reply fenced as a Markdown code block.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening line.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
