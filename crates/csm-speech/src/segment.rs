use serde::{Deserialize, Serialize};

/// One turn of conversational context: text, speaker, and optional reference
/// audio.
///
/// Immutable once constructed. The API surface never transmits context audio,
/// so `audio` stays empty for segments built from incoming requests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub speaker: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<f32>>,
}

impl Segment {
    pub fn new(text: impl Into<String>, speaker: u32) -> Self {
        Self {
            text: text.into(),
            speaker,
            audio: None,
        }
    }
}

/// Shape a loose context record must match to become a [`Segment`].
#[derive(Deserialize)]
struct ContextRecord {
    text: String,
    speaker: u32,
}

/// Convert loosely-typed context records into an ordered segment sequence.
///
/// A record converts only if it carries both a text and a speaker value;
/// anything else is dropped without error. Extra fields are ignored, output
/// order matches input order, and nothing is deduplicated.
pub fn normalize_context(records: &[serde_json::Value]) -> Vec<Segment> {
    records
        .iter()
        .filter_map(|record| {
            match serde_json::from_value::<ContextRecord>(record.clone()) {
                Ok(item) => Some(Segment::new(item.text, item.speaker)),
                Err(_) => {
                    log::debug!("Dropping malformed context item: {record}");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_records_convert_in_order() {
        let records = vec![
            json!({"text": "a", "speaker": 0}),
            json!({"foo": "bar"}),
            json!({"text": "b", "speaker": 1}),
        ];

        let segments = normalize_context(&records);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "a");
        assert_eq!(segments[0].speaker, 0);
        assert_eq!(segments[1].text, "b");
        assert_eq!(segments[1].speaker, 1);
    }

    #[test]
    fn missing_fields_drop_silently() {
        let records = vec![
            json!({"text": "only text"}),
            json!({"speaker": 2}),
            json!({}),
            json!(42),
            json!({"text": "kept", "speaker": 3}),
        ];

        let segments = normalize_context(&records);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "kept");
        assert_eq!(segments[0].speaker, 3);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let records = vec![json!({"text": "hi", "speaker": 0, "timestamp": 123})];
        let segments = normalize_context(&records);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn context_audio_is_not_transmitted() {
        let records = vec![json!({"text": "hi", "speaker": 0, "audio": [0.5, -0.5]})];
        let segments = normalize_context(&records);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].audio.is_none());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize_context(&[]).is_empty());
    }
}
