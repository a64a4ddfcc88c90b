//! Serverless job handler for the CSM speech generation service.
//!
//! Mirrors the hosted queue contract: one JSON event in, one JSON result
//! out, with the outcome encoded as a `statusCode` field rather than a
//! transport status. Generator resolution is lazy — it runs on the first
//! event after a cold start and is cached for the worker lifetime.

use csm_speech::{GenerationRequest, SpeechError, SpeechService};
use serde_json::{Value, json};

/// Job handler over a lazily resolved speech pipeline.
pub struct ServerlessHandler {
    service: SpeechService,
}

impl ServerlessHandler {
    /// Handler over a fresh pipeline; the generator resolves on the first
    /// event (cold start).
    pub fn new() -> Self {
        Self {
            service: SpeechService::new(),
        }
    }

    /// Handler over a specific pipeline.
    pub fn with_service(service: SpeechService) -> Self {
        Self { service }
    }

    /// Handle one job event.
    ///
    /// Never fails outward: every outcome is an envelope with `statusCode`
    /// 200 (success), 400 (missing text), or 500 (anything else, including
    /// model-load failure).
    pub async fn handle(&self, event: &Value) -> Value {
        let input = event.get("input").cloned().unwrap_or_else(|| json!({}));

        let text = input.get("text").and_then(Value::as_str).unwrap_or("");
        if text.trim().is_empty() {
            return json!({
                "error": "No text provided",
                "statusCode": 400
            });
        }

        let request: GenerationRequest = match serde_json::from_value(input) {
            Ok(request) => request,
            Err(e) => {
                log::error!("Malformed job input: {e}");
                return json!({
                    "error": format!("Malformed input: {e}"),
                    "statusCode": 500
                });
            }
        };

        match self.service.generate(request).await {
            Ok(response) => json!({
                "audio_base64": response.audio_base64,
                "sample_rate": response.sample_rate,
                "duration_ms": response.duration_ms,
                "statusCode": 200
            }),
            Err(SpeechError::InvalidInput(message)) => json!({
                "error": message,
                "statusCode": 400
            }),
            Err(e) => {
                log::error!("Error in serverless handler: {e}");
                json!({
                    "error": e.to_string(),
                    "statusCode": 500
                })
            }
        }
    }
}

impl Default for ServerlessHandler {
    fn default() -> Self {
        Self::new()
    }
}
