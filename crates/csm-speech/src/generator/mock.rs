//! Mock model tier: duck-typed stand-ins for the tokenizer and code sampler.
//!
//! Mirrors the checkpoint-backed call path without any checkpoint on disk,
//! so environments with neither a local nor a downloadable model still get a
//! generator whose output length and timing behave like the real thing.

use crate::error::{Result, SpeechError};
use crate::generator::synthetic::capped_sample_count;
use crate::generator::{SpeechGenerator, noise_samples};
use crate::segment::Segment;
use crate::types::SAMPLE_RATE;
use candle_core::Device;
use rand::RngExt;

const MOCK_VOCAB_SIZE: u32 = 1000;
const MOCK_CODE_COUNT: usize = 100;
const MOCK_MAX_TOKENS: usize = 512;
const MOCK_NOISE_STD: f32 = 0.1;

/// Whitespace stand-in for the real tokenizer.
fn mock_token_count(text: &str) -> usize {
    text.split_whitespace().count().clamp(1, MOCK_MAX_TOKENS)
}

/// Always-constructible generator backed by mock model components.
#[derive(Debug)]
pub struct MockGenerator {
    device: Device,
}

impl MockGenerator {
    pub fn new(device: Device) -> Self {
        Self { device }
    }
}

impl SpeechGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn generate(
        &self,
        text: &str,
        _speaker: u32,
        context: &[Segment],
        max_audio_length_ms: u32,
    ) -> Result<Vec<f32>> {
        let token_count = mock_token_count(text);
        let mut rng = rand::rng();
        let _codes: Vec<u32> = (0..MOCK_CODE_COUNT)
            .map(|_| rng.random_range(0..MOCK_VOCAB_SIZE))
            .collect();
        log::debug!(
            "Mock generation: {token_count} tokens, {} context segments",
            context.len()
        );

        let count = capped_sample_count(max_audio_length_ms);
        noise_samples(count, MOCK_NOISE_STD, &self.device)
            .map_err(|e| SpeechError::GenerationFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MAX_AUDIO_SAMPLES;

    #[test]
    fn token_count_follows_whitespace() {
        assert_eq!(mock_token_count("one two three"), 3);
        assert_eq!(mock_token_count(""), 1);
    }

    #[test]
    fn output_respects_the_length_cap() {
        let generator = MockGenerator::new(Device::Cpu);
        let samples = generator.generate("hi there", 0, &[], 20_000).unwrap();
        assert_eq!(samples.len(), MAX_AUDIO_SAMPLES);
    }

    #[test]
    fn output_is_low_amplitude_noise() {
        let generator = MockGenerator::new(Device::Cpu);
        let samples = generator.generate("hi", 0, &[], 1000).unwrap();
        assert_eq!(samples.len(), 24_000);

        let energy: f64 = samples.iter().map(|s| (*s as f64).powi(2)).sum();
        let rms = (energy / samples.len() as f64).sqrt();
        assert!(rms > 0.05 && rms < 0.2, "rms {rms}");
    }
}
