use serde::{Deserialize, Serialize};

/// Fixed output sample rate for all audio produced by the service, in Hz.
pub const SAMPLE_RATE: u32 = 24_000;

/// Hard ceiling on produced audio: ten seconds at the fixed sample rate.
pub const MAX_AUDIO_SAMPLES: usize = 240_000;

/// Mono audio with samples normalized to [-1.0, 1.0].
#[derive(Clone, Debug)]
pub struct AudioData {
    /// Audio samples
    pub samples: Vec<f32>,
    /// Number of audio channels (always 1 for generated speech)
    pub channels: usize,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioData {
    /// Wrap a sample buffer as single-channel audio.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: 1,
            sample_rate,
        }
    }

    /// Duration derived from the actual sample count, rounded down.
    pub fn duration_ms(&self) -> u64 {
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }
}

/// Speech generation request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub text: String,
    #[serde(default)]
    pub speaker: u32,
    #[serde(default = "default_max_audio_length_ms")]
    pub max_audio_length_ms: u32,
    /// Loosely-typed conversational context; malformed items are dropped
    /// during normalization.
    #[serde(default)]
    pub context: Vec<serde_json::Value>,
}

fn default_max_audio_length_ms() -> u32 {
    10_000
}

impl GenerationRequest {
    /// Request with default speaker, length bound, and empty context.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speaker: 0,
            max_audio_length_ms: default_max_audio_length_ms(),
            context: Vec::new(),
        }
    }

    pub fn with_speaker(mut self, speaker: u32) -> Self {
        self.speaker = speaker;
        self
    }

    pub fn with_max_audio_length_ms(mut self, max_audio_length_ms: u32) -> Self {
        self.max_audio_length_ms = max_audio_length_ms;
        self
    }
}

/// Speech generation response: base64 WAV plus derived metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub audio_base64: String,
    pub sample_rate: u32,
    pub duration_ms: u64,
}
