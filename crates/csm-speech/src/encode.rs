//! WAV container and base64 transport encoding.

use crate::error::Result;
use crate::types::{AudioData, GenerationResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::Cursor;

/// Serialize samples into a mono 32-bit float WAV container.
pub fn wav_bytes(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

/// Encode a finished audio buffer into the transport payload.
///
/// `duration_ms` derives from the actual sample count, not the requested
/// length — the two differ whenever the ten-second cap was hit.
pub fn encode_response(audio: &AudioData) -> Result<GenerationResponse> {
    let bytes = wav_bytes(&audio.samples, audio.sample_rate)?;
    let audio_base64 = STANDARD.encode(&bytes);

    Ok(GenerationResponse {
        audio_base64,
        sample_rate: audio.sample_rate,
        duration_ms: audio.duration_ms(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SAMPLE_RATE;

    fn read_wav(bytes: &[u8]) -> (hound::WavSpec, Vec<f32>) {
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        let samples = reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        (spec, samples)
    }

    #[test]
    fn wav_round_trips_samples() {
        let samples = vec![0.0, 0.5, -0.5, 1.0, -1.0];
        let bytes = wav_bytes(&samples, SAMPLE_RATE).unwrap();

        let (spec, decoded) = read_wav(&bytes);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, SAMPLE_RATE);
        assert_eq!(spec.sample_format, hound::SampleFormat::Float);
        assert_eq!(decoded, samples);
    }

    #[test]
    fn empty_buffer_is_a_valid_container() {
        let bytes = wav_bytes(&[], SAMPLE_RATE).unwrap();
        let (_, decoded) = read_wav(&bytes);
        assert!(decoded.is_empty());
    }

    #[test]
    fn response_duration_follows_actual_sample_count() {
        let audio = AudioData::mono(vec![0.1; 120_000], SAMPLE_RATE);
        let response = encode_response(&audio).unwrap();
        assert_eq!(response.sample_rate, SAMPLE_RATE);
        assert_eq!(response.duration_ms, 5000);

        let decoded_bytes = STANDARD.decode(&response.audio_base64).unwrap();
        let (_, decoded) = read_wav(&decoded_bytes);
        assert_eq!(decoded.len(), 120_000);
    }

    #[test]
    fn duration_rounds_down() {
        let audio = AudioData::mono(vec![0.0; 23_999], SAMPLE_RATE);
        let response = encode_response(&audio).unwrap();
        assert_eq!(response.duration_ms, 999);
    }
}
