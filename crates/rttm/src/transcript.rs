//! Ground-truth import from transcript JSON.
//!
//! The source format is a JSON object whose values are arrays of
//! utterances: `{ "<key>": [{ "episode": ..., "speaker": ...,
//! "utterance_start": ..., "duration": ... }, ...] }`. Conversion yields a
//! reference [`Annotation`] ready to be written out as RTTM.

use crate::{secs_to_ms, Result, RttmError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use whosaid_timeline::{Annotation, Segment};

/// Episode identifier, a bare number or a string depending on the export.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EpisodeId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeId::Number(n) => write!(f, "{n}"),
            EpisodeId::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Utterance {
    pub speaker: String,
    pub utterance_start: f64,
    pub duration: f64,
    #[serde(default)]
    pub episode: Option<EpisodeId>,
}

/// Whole transcript document, keyed by section. BTreeMap keeps the
/// utterance order stable across runs.
pub type TranscriptDoc = BTreeMap<String, Vec<Utterance>>;

pub fn parse_transcript_str(content: &str) -> Result<TranscriptDoc> {
    Ok(serde_json::from_str(content)?)
}

pub fn parse_transcript_file(path: &Path) -> Result<TranscriptDoc> {
    let content = std::fs::read_to_string(path).map_err(|e| RttmError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_transcript_str(&content)
}

/// Recording identifier for RTTM output: `ep-<episode>` of the first
/// utterance that carries one.
pub fn transcript_uri(doc: &TranscriptDoc) -> Option<String> {
    doc.values()
        .flatten()
        .find_map(|u| u.episode.as_ref())
        .map(|ep| format!("ep-{ep}"))
}

/// Build the reference annotation from a transcript document.
///
/// Speaker names are normalized by replacing spaces with underscores so
/// they survive the whitespace-delimited RTTM rendering. Zero-duration
/// utterances are skipped with a warning; negative times are rejected.
pub fn annotation_from_transcript(doc: &TranscriptDoc) -> Result<Annotation> {
    let mut annotation = Annotation::new();
    for utterance in doc.values().flatten() {
        let speaker = utterance.speaker.replace(' ', "_");
        if !utterance.utterance_start.is_finite() || utterance.utterance_start < 0.0 {
            return Err(RttmError::InvalidUtterance {
                speaker,
                reason: format!("negative start {}", utterance.utterance_start),
            });
        }
        if !utterance.duration.is_finite() || utterance.duration < 0.0 {
            return Err(RttmError::InvalidUtterance {
                speaker,
                reason: format!("negative duration {}", utterance.duration),
            });
        }

        let start_ms = secs_to_ms(utterance.utterance_start);
        let end_ms = start_ms + secs_to_ms(utterance.duration);
        if start_ms == end_ms {
            tracing::warn!(%speaker, start_ms, "skipping zero-duration utterance");
            continue;
        }
        annotation
            .add(Segment::new(start_ms, end_ms), speaker)
            .expect("non-empty segment");
    }
    Ok(annotation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "segment-1": [
            {"episode": 11, "speaker": "Alice Smith", "utterance_start": 0.0, "duration": 4.25},
            {"episode": 11, "speaker": "Bob", "utterance_start": 4.25, "duration": 2.0}
        ],
        "segment-2": [
            {"episode": 11, "speaker": "Alice Smith", "utterance_start": 6.25, "duration": 1.5}
        ]
    }"#;

    #[test]
    fn test_parse_and_convert() {
        let doc = parse_transcript_str(SAMPLE).unwrap();
        let annotation = annotation_from_transcript(&doc).unwrap();
        assert_eq!(annotation.len(), 3);
        assert_eq!(annotation.labels(), vec!["Alice_Smith", "Bob"]);
        assert_eq!(annotation.speech_ms(), 7750);
    }

    #[test]
    fn test_speaker_names_lose_spaces() {
        let doc = parse_transcript_str(SAMPLE).unwrap();
        let annotation = annotation_from_transcript(&doc).unwrap();
        assert!(annotation.iter().all(|t| !t.speaker.contains(' ')));
    }

    #[test]
    fn test_uri_from_numeric_episode() {
        let doc = parse_transcript_str(SAMPLE).unwrap();
        assert_eq!(transcript_uri(&doc).as_deref(), Some("ep-11"));
    }

    #[test]
    fn test_uri_from_string_episode() {
        let content = r#"{"s": [{"episode": "pilot", "speaker": "A", "utterance_start": 0, "duration": 1}]}"#;
        let doc = parse_transcript_str(content).unwrap();
        assert_eq!(transcript_uri(&doc).as_deref(), Some("ep-pilot"));
    }

    #[test]
    fn test_missing_episode_means_no_uri() {
        let content = r#"{"s": [{"speaker": "A", "utterance_start": 0, "duration": 1}]}"#;
        let doc = parse_transcript_str(content).unwrap();
        assert_eq!(transcript_uri(&doc), None);
    }

    #[test]
    fn test_zero_duration_skipped() {
        let content = r#"{"s": [
            {"speaker": "A", "utterance_start": 0, "duration": 0},
            {"speaker": "A", "utterance_start": 1, "duration": 1}
        ]}"#;
        let doc = parse_transcript_str(content).unwrap();
        let annotation = annotation_from_transcript(&doc).unwrap();
        assert_eq!(annotation.len(), 1);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let content = r#"{"s": [{"speaker": "A", "utterance_start": 0, "duration": -1}]}"#;
        let doc = parse_transcript_str(content).unwrap();
        let err = annotation_from_transcript(&doc).unwrap_err();
        assert!(matches!(err, RttmError::InvalidUtterance { .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            parse_transcript_str("not json"),
            Err(RttmError::InvalidTranscript(_))
        ));
    }
}
