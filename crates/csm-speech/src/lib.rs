//! # CSM Speech
//!
//! Core speech generation pipeline for the CSM service.
//!
//! The crate resolves a speech generator through a tiered cascade (local
//! checkpoint, hosted pretrained checkpoint, mock model, synthetic waveform),
//! normalizes conversational context into typed segments, synthesizes bounded
//! audio, and encodes the result as a base64 WAV payload for JSON transport.
//!
//! The two public operations the transport layers build on:
//!
//! - [`ModelRegistry::get_or_resolve`]: obtain the process-wide generator
//!   handle, running the resolution cascade on first use.
//! - [`SpeechService::generate`]: run one request through the full
//!   validate → normalize → synthesize → encode pipeline.
//!
//! ## Example
//!
//! ```rust,ignore
//! use csm_speech::{GenerationRequest, SpeechService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = SpeechService::new();
//!     let response = service
//!         .generate(GenerationRequest::new("Hello from CSM"))
//!         .await?;
//!     println!("{} ms of audio", response.duration_ms);
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod encode;
pub mod error;
pub mod generator;
pub mod handler;
pub mod segment;
pub mod types;

pub use device::select_device;
pub use error::{Result, SpeechError};
pub use generator::resolve::{ModelRegistry, resolve_generator};
pub use generator::{GeneratorHandle, SpeechGenerator};
pub use handler::SpeechService;
pub use segment::{Segment, normalize_context};
pub use types::{
    AudioData, GenerationRequest, GenerationResponse, MAX_AUDIO_SAMPLES, SAMPLE_RATE,
};
