//! Diagnosis request contract and reply interpretation
//!
//! Transport-agnostic: a host (reqwest, the browser fetch API) sends the
//! multipart request described here and hands back a [`RawReply`].

use crate::error::SubmissionError;
use crate::intake::ImageFile;
use crate::types::{DiagnosisResult, EnvironmentRecord, Prediction, ResultOrigin, Severity};
use serde::Deserialize;
use serde_json::Value;

/// Path of the diagnosis endpoint, relative to the backend base URL
pub const DIAGNOSE_PATH: &str = "/diagnose";
/// Multipart part carrying the raw image bytes
pub const IMAGE_PART: &str = "image";
/// Multipart part carrying the environment record as JSON text
pub const ENV_PART: &str = "env_data";

/// Remedy text used when the backend sent none
pub const REMEDY_PLACEHOLDER: &str = "No treatment information available.";

pub const FALLBACK_DISEASE: &str = "Late Blight";
pub const FALLBACK_CONFIDENCE: f64 = 0.985;
pub const FALLBACK_REMEDY: &str = "## Treatment for Late Blight\n\n\
* Apply fungicide with active ingredient copper sulfate.\n\
* Remove affected plant parts immediately.\n\
* Half cup of baking soda in 1 gallon of water can be used as a preventative spray.";
const FALLBACK_IMAGE: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQAAAQABAAD/2wBDAAIBAQEBAQIBAQECAgICAgQDAgICAgUEBAMEBgUGBgYFBgYGBwkIBgcJBwYGCAsICQoKCgoKBggLDAsKDAkKCgr/";

/// What to show when a submission fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Alert, then show the demonstration result
    #[default]
    Demo,
    /// Alert only and stay on the environment step
    Disabled,
}

/// Identifies one submission; replies for an older ticket are discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub(crate) u64);

/// Everything a transport needs to issue the POST
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub ticket: Ticket,
    pub image: ImageFile,
    pub env: EnvironmentRecord,
}

impl SubmissionRequest {
    /// JSON text for the `env_data` part
    pub fn env_json(&self) -> String {
        crate::form::env_data_json(&self.env)
    }
}

/// Status and body of the HTTP response, as text
#[derive(Debug, Clone, PartialEq)]
pub struct RawReply {
    pub status: u16,
    /// Canonical reason phrase, if the transport knows it
    pub reason: Option<String>,
    pub body: String,
}

impl RawReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Success body of `POST /diagnose`
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnoseResponse {
    pub prediction: Prediction,
    #[serde(default)]
    pub remedy: Option<String>,
    #[serde(default)]
    pub explanation_img: Option<String>,
}

impl DiagnoseResponse {
    pub fn into_result(self) -> DiagnosisResult {
        let remedy_markdown = self
            .remedy
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| REMEDY_PLACEHOLDER.to_string());

        DiagnosisResult {
            prediction: self.prediction,
            remedy_markdown,
            reference_image: self.explanation_img.filter(|s| !s.is_empty()),
            origin: ResultOrigin::Backend,
        }
    }
}

/// Map a raw reply into a result or a failure
pub fn interpret_reply(reply: &RawReply) -> Result<DiagnosisResult, SubmissionError> {
    if !reply.is_success() {
        return Err(SubmissionError::Status {
            status: reply.status,
            detail: error_detail(reply),
        });
    }

    let response: DiagnoseResponse = serde_json::from_str(&reply.body)
        .map_err(|e| SubmissionError::Malformed(e.to_string()))?;
    Ok(response.into_result())
}

/// Best human-readable text from an error body (JSON or plain)
fn error_detail(reply: &RawReply) -> String {
    let body = reply.body.trim();
    if body.is_empty() {
        return reply
            .reason
            .clone()
            .unwrap_or_else(|| "empty response body".to_string());
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["message", "detail", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        Ok(other) => other.to_string(),
        Err(_) => body.to_string(),
    }
}

/// The fixed demonstration result shown after a failure
pub fn fallback_result() -> DiagnosisResult {
    DiagnosisResult {
        prediction: Prediction {
            disease: FALLBACK_DISEASE.to_string(),
            severity: Severity::High,
            confidence: FALLBACK_CONFIDENCE,
        },
        remedy_markdown: FALLBACK_REMEDY.to_string(),
        reference_image: Some(FALLBACK_IMAGE.to_string()),
        origin: ResultOrigin::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_reply_maps_nested_prediction() {
        let reply = RawReply::new(
            200,
            r#"{
                "prediction": {"disease": "Cotton___Bacterial_blight", "severity": "Medium", "confidence": 0.91},
                "remedy": "* Use certified seed",
                "explanation_img": "abc123"
            }"#,
        );
        let result = interpret_reply(&reply).unwrap();
        assert_eq!(result.prediction.disease, "Cotton___Bacterial_blight");
        assert_eq!(result.prediction.severity, Severity::Medium);
        assert_eq!(result.prediction.confidence, 0.91);
        assert_eq!(result.remedy_markdown, "* Use certified seed");
        assert_eq!(result.reference_image.as_deref(), Some("abc123"));
        assert_eq!(result.origin, ResultOrigin::Backend);
    }

    #[test]
    fn test_missing_or_empty_remedy_uses_placeholder() {
        let bare = r#"{"prediction": {"disease": "Healthy", "severity": "Low", "confidence": 0.99}}"#;
        let result = interpret_reply(&RawReply::new(200, bare)).unwrap();
        assert_eq!(result.remedy_markdown, REMEDY_PLACEHOLDER);
        assert!(result.reference_image.is_none());

        let empty = r#"{"prediction": {"disease": "Healthy", "severity": "Low", "confidence": 0.99}, "remedy": ""}"#;
        let result = interpret_reply(&RawReply::new(200, empty)).unwrap();
        assert_eq!(result.remedy_markdown, REMEDY_PLACEHOLDER);
    }

    #[test]
    fn test_plain_text_error_body() {
        let err = interpret_reply(&RawReply::new(500, "Internal Error")).unwrap_err();
        assert_eq!(
            err,
            SubmissionError::Status {
                status: 500,
                detail: "Internal Error".to_string()
            }
        );
    }

    #[test]
    fn test_json_error_body_message() {
        let reply = RawReply::new(400, r#"{"message": "Invalid JSON format for env_data"}"#);
        let err = interpret_reply(&reply).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON format for env_data"));
    }

    #[test]
    fn test_json_error_without_known_key_is_compacted() {
        let reply = RawReply::new(422, r#"{ "loc": ["body", "image"] }"#);
        let err = interpret_reply(&reply).unwrap_err();
        assert!(err.to_string().contains(r#"{"loc":["body","image"]}"#));
    }

    #[test]
    fn test_empty_error_body_uses_reason() {
        let reply = RawReply {
            status: 503,
            reason: Some("Service Unavailable".to_string()),
            body: String::new(),
        };
        let err = interpret_reply(&reply).unwrap_err();
        assert_eq!(err.to_string(), "Network error: 503 - Service Unavailable");
    }

    #[test]
    fn test_unparseable_success_body_is_malformed() {
        let err = interpret_reply(&RawReply::new(200, "<html>oops</html>")).unwrap_err();
        assert!(matches!(err, SubmissionError::Malformed(_)));
    }

    #[test]
    fn test_fallback_result_is_marked() {
        let result = fallback_result();
        assert_eq!(result.prediction.disease, "Late Blight");
        assert_eq!(result.prediction.severity, Severity::High);
        assert!(result.is_fallback());
        assert!(result
            .reference_image
            .as_deref()
            .is_some_and(|img| img.starts_with("data:image/jpeg;base64,")));
    }
}
