//! Speech generator capability and the tiered strategies that produce one.
//!
//! A generator is resolved once per process through the cascade in
//! [`resolve`] and shared read-only afterwards. Each tier implements the same
//! [`SpeechGenerator`] capability:
//!
//! - [`csm::CsmGenerator`] — checkpoint-backed model, local or hosted
//! - [`mock::MockGenerator`] — duck-typed stand-in for the model stack
//! - [`synthetic::SyntheticGenerator`] — terminal sine-plus-noise fallback

pub mod csm;
pub mod mock;
pub mod resolve;
pub mod source;
pub mod synthetic;

use crate::error::Result;
use crate::segment::Segment;
use candle_core::{Device, Tensor};
use std::sync::Arc;

/// A resolved speech generator.
///
/// Handles carry no request-scoped state: every call is independent, and the
/// output buffer is exclusively owned by the caller. `generate` is a blocking
/// computation; async callers run it on a blocking thread.
pub trait SpeechGenerator: Send + Sync + std::fmt::Debug {
    /// Short name of the backing tier, for logs and diagnostics.
    fn name(&self) -> &str;

    /// Fixed output sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Synthesize at most `max_audio_length_ms` of audio for `text`, never
    /// more than ten seconds.
    fn generate(
        &self,
        text: &str,
        speaker: u32,
        context: &[Segment],
        max_audio_length_ms: u32,
    ) -> Result<Vec<f32>>;
}

/// Process-wide shared generator capability.
pub type GeneratorHandle = Arc<dyn SpeechGenerator>;

/// Draw `count` gaussian samples with the given standard deviation.
pub(crate) fn noise_samples(
    count: usize,
    std: f32,
    device: &Device,
) -> candle_core::Result<Vec<f32>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    Tensor::randn(0f32, std, (count,), device)?.to_vec1::<f32>()
}
