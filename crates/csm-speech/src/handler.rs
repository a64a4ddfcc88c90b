//! Request orchestration: validate, normalize, synthesize, encode.

use crate::device::select_device;
use crate::encode::encode_response;
use crate::error::{Result, SpeechError};
use crate::generator::resolve::ModelRegistry;
use crate::generator::{GeneratorHandle, SpeechGenerator};
use crate::segment::normalize_context;
use crate::types::{AudioData, GenerationRequest, GenerationResponse};
use candle_core::Device;
use std::sync::Arc;

/// How much of the input text makes it into log lines.
const LOG_TEXT_CHARS: usize = 50;

/// The request-facing speech pipeline.
///
/// Owns the generator registry and the selected compute device. The registry
/// is injected rather than ambient so transports and tests can share or
/// replace it.
pub struct SpeechService {
    registry: Arc<ModelRegistry>,
    device: Device,
}

impl SpeechService {
    /// Service over a fresh registry; the generator resolves on first use.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ModelRegistry::new()))
    }

    /// Service over a shared registry.
    pub fn with_registry(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            device: select_device(),
        }
    }

    /// Service pinned to a specific generator.
    pub fn with_generator(handle: GeneratorHandle) -> Self {
        let service = Self::new();
        service.registry.install(handle);
        service
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Resolve the generator now instead of on the first request.
    pub async fn warm_up(&self) -> Result<()> {
        self.resolve_handle().await.map(|_| ())
    }

    async fn resolve_handle(&self) -> Result<GeneratorHandle> {
        if let Some(handle) = self.registry.get() {
            return Ok(handle);
        }
        let registry = self.registry.clone();
        let device = self.device.clone();
        tokio::task::spawn_blocking(move || registry.get_or_resolve(&device))
            .await
            .map_err(|e| SpeechError::ModelLoad(format!("resolution task failed: {e}")))?
    }

    /// Run one request through the full pipeline.
    ///
    /// Validation failures surface as [`SpeechError::InvalidInput`] before
    /// any generation work; synthesis and encoding failures are logged and
    /// surfaced as [`SpeechError::GenerationFailed`], never as raw low-level
    /// errors.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        if request.text.trim().is_empty() {
            return Err(SpeechError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }

        let snippet = log_snippet(&request.text);
        log::info!("Generating audio for text: {snippet}...");

        match self.synthesize(request).await {
            Ok(response) => {
                log::info!(
                    "Generated audio successfully, duration: {}ms",
                    response.duration_ms
                );
                Ok(response)
            }
            Err(e) => {
                log::error!("Audio generation failed for text '{snippet}': {e}");
                Err(coerce_pipeline_error(e))
            }
        }
    }

    async fn synthesize(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let generator = self.resolve_handle().await?;
        let segments = normalize_context(&request.context);

        let GenerationRequest {
            text,
            speaker,
            max_audio_length_ms,
            ..
        } = request;

        let audio = tokio::task::spawn_blocking(move || {
            let sample_rate = generator.sample_rate();
            generator
                .generate(&text, speaker, &segments, max_audio_length_ms)
                .map(|samples| AudioData::mono(samples, sample_rate))
        })
        .await
        .map_err(|e| SpeechError::GenerationFailed(format!("synthesis task failed: {e}")))??;

        encode_response(&audio)
    }
}

impl Default for SpeechService {
    fn default() -> Self {
        Self::new()
    }
}

fn log_snippet(text: &str) -> String {
    text.chars().take(LOG_TEXT_CHARS).collect()
}

/// Fold transport-unfriendly errors into the request-level taxonomy.
fn coerce_pipeline_error(err: SpeechError) -> SpeechError {
    match err {
        SpeechError::InvalidInput(_)
        | SpeechError::ModelLoad(_)
        | SpeechError::GenerationFailed(_) => err,
        other => SpeechError::GenerationFailed(other.to_string()),
    }
}
