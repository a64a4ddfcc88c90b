use thiserror::Error;

/// Errors surfaced by the speech pipeline.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Every tier of the generator cascade failed. The terminal tier cannot
    /// fail, so this variant is unreachable in practice.
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    /// A request failed during synthesis or encoding.
    #[error("Audio generation failed: {0}")]
    GenerationFailed(String),

    /// Missing or empty input text.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// WAV container error
    #[error("Audio encoding failed: {0}")]
    Encoding(#[from] hound::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for speech operations
pub type Result<T> = std::result::Result<T, SpeechError>;
