//! Terminal fallback tier: a sine carrier with gaussian noise.
//!
//! Deterministic given its inputs apart from the injected noise, independent
//! of network and accelerator availability, and incapable of failing. Serves
//! both as the last-resort production fallback and as the natural test
//! double for the pipeline.

use crate::error::Result;
use crate::generator::{SpeechGenerator, noise_samples};
use crate::segment::Segment;
use crate::types::{MAX_AUDIO_SAMPLES, SAMPLE_RATE};
use candle_core::Device;

const SIGNAL_AMPLITUDE: f64 = 0.3;
const NOISE_STD: f32 = 0.05;
const BASE_FREQUENCY_HZ: f64 = 440.0;
const SPEAKER_FREQUENCY_STEP_HZ: f64 = 100.0;

/// Number of samples produced for a requested length, capped at ten seconds.
pub fn capped_sample_count(max_audio_length_ms: u32) -> usize {
    let requested = (max_audio_length_ms as u64 * SAMPLE_RATE as u64 / 1000) as usize;
    requested.min(MAX_AUDIO_SAMPLES)
}

/// Sine-plus-noise placeholder audio for one clip.
///
/// The time axis spans `[0, max_audio_length_ms / 1000)` seconds across the
/// capped sample count; the carrier sits at `440 + 100 * speaker` Hz.
pub fn synthetic_waveform(speaker: u32, max_audio_length_ms: u32) -> Vec<f32> {
    let count = capped_sample_count(max_audio_length_ms);
    if count == 0 {
        return Vec::new();
    }

    let duration_s = max_audio_length_ms as f64 / 1000.0;
    let step = duration_s / count as f64;
    let frequency = BASE_FREQUENCY_HZ + speaker as f64 * SPEAKER_FREQUENCY_STEP_HZ;
    let omega = std::f64::consts::TAU * frequency;

    let mut samples: Vec<f32> = (0..count)
        .map(|i| (SIGNAL_AMPLITUDE * (omega * i as f64 * step).sin()) as f32)
        .collect();

    // The noise draw cannot be allowed to fail this tier; a clean carrier is
    // an acceptable degenerate output.
    let noise = match noise_samples(count, NOISE_STD, &Device::Cpu) {
        Ok(noise) => noise,
        Err(e) => {
            log::warn!("Noise draw failed, emitting clean carrier: {e}");
            vec![0.0; count]
        }
    };
    for (sample, n) in samples.iter_mut().zip(noise) {
        *sample += n;
    }

    samples
}

/// Always-available generator producing the synthetic waveform.
#[derive(Debug, Default)]
pub struct SyntheticGenerator;

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechGenerator for SyntheticGenerator {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn generate(
        &self,
        _text: &str,
        speaker: u32,
        _context: &[Segment],
        max_audio_length_ms: u32,
    ) -> Result<Vec<f32>> {
        Ok(synthetic_waveform(speaker, max_audio_length_ms))
    }
}
