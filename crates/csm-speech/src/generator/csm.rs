//! CSM model backend: checkpoint loading and bounded generation.
//!
//! The checkpoint-backed tiers (local and hosted) both land here; they differ
//! only in where [`ModelSource`] finds the files. Generation failures never
//! escape a call: the generator falls back to the synthetic waveform within
//! the same call and logs a warning.

use crate::error::{Result, SpeechError};
use crate::generator::source::ModelSource;
use crate::generator::synthetic::{capped_sample_count, synthetic_waveform};
use crate::generator::{SpeechGenerator, noise_samples};
use crate::segment::Segment;
use crate::types::SAMPLE_RATE;
use candle_core::{Device, Tensor};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokenizers::Tokenizer;

static GRAPH_COMPILE_DISABLED: AtomicBool = AtomicBool::new(false);

/// Disable just-in-time graph compilation for subsequently loaded
/// checkpoints.
///
/// Must run before resolution begins; only the checkpoint-backed tiers
/// consult the switch.
pub fn disable_graph_compile() {
    GRAPH_COMPILE_DISABLED.store(true, Ordering::SeqCst);
}

pub(crate) fn graph_compile_disabled() -> bool {
    GRAPH_COMPILE_DISABLED.load(Ordering::SeqCst)
}

/// Generation constants carried by the checkpoint.
#[derive(Debug, Clone)]
pub struct CsmConfig {
    /// Input text is truncated to this many tokens.
    pub max_text_tokens: usize,
    /// Each acoustic code covers roughly this much audio.
    pub ms_per_code: u32,
    /// Sampling temperature (reserved until the decoder lands).
    #[allow(dead_code)]
    pub temperature: f64,
}

impl Default for CsmConfig {
    fn default() -> Self {
        Self {
            max_text_tokens: 512,
            ms_per_code: 20,
            temperature: 0.7,
        }
    }
}

const PLACEHOLDER_NOISE_STD: f32 = 0.1;

/// A loaded CSM checkpoint: tokenizer plus weight tensors.
#[derive(Debug)]
pub struct CsmModel {
    tokenizer: Tokenizer,
    /// Backbone weight tensors (held until the decoder lands).
    #[allow(dead_code)]
    weights: HashMap<String, Tensor>,
    device: Device,
    config: CsmConfig,
}

impl CsmModel {
    /// Load a checkpoint from the given source onto `device`.
    pub fn load(source: &ModelSource, device: &Device) -> Result<Self> {
        let files = source
            .resolve()
            .map_err(|e| SpeechError::ModelLoad(e.to_string()))?;

        let tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| SpeechError::ModelLoad(format!("tokenizer load failed: {e}")))?;

        let weights = candle_core::safetensors::load(&files.weights, device)
            .map_err(|e| SpeechError::ModelLoad(format!("weights load failed: {e}")))?;
        if weights.is_empty() {
            return Err(SpeechError::ModelLoad(
                "checkpoint contains no tensors".to_string(),
            ));
        }

        if graph_compile_disabled() {
            log::debug!("Graph pre-compilation disabled, skipping warmup pass");
        }

        log::info!(
            "Loaded CSM checkpoint: {} tensors on {:?}",
            weights.len(),
            device
        );

        Ok(Self {
            tokenizer,
            weights,
            device: device.clone(),
            config: CsmConfig::default(),
        })
    }

    /// Generate up to `max_audio_length_ms` of audio for `text`.
    pub fn generate(
        &self,
        text: &str,
        _speaker: u32,
        context: &[Segment],
        max_audio_length_ms: u32,
    ) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| SpeechError::GenerationFailed(format!("tokenization failed: {e}")))?;
        let mut ids: Vec<u32> = encoding.get_ids().to_vec();
        ids.truncate(self.config.max_text_tokens);

        let input = Tensor::new(ids.as_slice(), &self.device)
            .map_err(|e| SpeechError::GenerationFailed(e.to_string()))?;
        let token_count = input
            .dims1()
            .map_err(|e| SpeechError::GenerationFailed(e.to_string()))?;
        let code_budget = (max_audio_length_ms / self.config.ms_per_code).max(1);
        log::debug!(
            "Generating {code_budget} codes from {token_count} tokens ({} context segments)",
            context.len()
        );

        // TODO: run the backbone over `input` and decode the sampled codes
        // through the Mimi RVQ decoder once its weights are wired up. Until
        // then the clip is filled with placeholder noise at the target
        // length.
        let count = capped_sample_count(max_audio_length_ms);
        noise_samples(count, PLACEHOLDER_NOISE_STD, &self.device)
            .map_err(|e| SpeechError::GenerationFailed(e.to_string()))
    }
}

/// Checkpoint-backed generator with in-call fallback to the synthetic
/// waveform.
#[derive(Debug)]
pub struct CsmGenerator {
    model: CsmModel,
    tier: &'static str,
}

impl CsmGenerator {
    /// Load from a locally installed checkpoint.
    pub fn from_local(device: &Device) -> Result<Self> {
        let model = CsmModel::load(&ModelSource::local_default(), device)?;
        Ok(Self {
            model,
            tier: "csm-local",
        })
    }

    /// Download the pretrained checkpoint from the hosted hub, then load it.
    pub fn from_hosted(device: &Device) -> Result<Self> {
        let model = CsmModel::load(&ModelSource::hosted_default(), device)?;
        Ok(Self {
            model,
            tier: "csm-hosted",
        })
    }
}

impl SpeechGenerator for CsmGenerator {
    fn name(&self) -> &str {
        self.tier
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn generate(
        &self,
        text: &str,
        speaker: u32,
        context: &[Segment],
        max_audio_length_ms: u32,
    ) -> Result<Vec<f32>> {
        match self.model.generate(text, speaker, context, max_audio_length_ms) {
            Ok(samples) => Ok(samples),
            Err(e) => {
                log::warn!("Model generation failed, using synthetic waveform: {e}");
                Ok(synthetic_waveform(speaker, max_audio_length_ms))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_switch_is_sticky() {
        disable_graph_compile();
        assert!(graph_compile_disabled());
    }

    #[test]
    fn config_defaults_match_checkpoint_constants() {
        let config = CsmConfig::default();
        assert_eq!(config.max_text_tokens, 512);
        assert_eq!(config.ms_per_code, 20);
    }

    #[test]
    fn local_load_fails_without_checkpoint() {
        let source = ModelSource::LocalDir("/nonexistent/csm".into());
        let err = CsmModel::load(&source, &Device::Cpu).unwrap_err();
        assert!(matches!(err, SpeechError::ModelLoad(_)));
    }

    #[test]
    #[ignore = "requires a hub download"]
    fn hosted_load_fetches_checkpoint() {
        let generator = CsmGenerator::from_hosted(&Device::Cpu).unwrap();
        assert_eq!(generator.sample_rate(), SAMPLE_RATE);
    }
}
