//! RTTM codec and transcript import.
//!
//! RTTM is the plain-text exchange format for diarization: one
//! `SPEAKER <uri> <chan> <tstart> <tdur> <ortho> <stype> <name> <conf> [<slat>]`
//! line per turn, timestamps in decimal seconds. Parsing converts to the
//! millisecond [`Annotation`] model; writing renders back to seconds.

pub mod transcript;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use whosaid_timeline::{Annotation, Segment};

#[derive(Debug, thiserror::Error)]
pub enum RttmError {
    #[error("failed to read '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed RTTM line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("invalid transcript: {0}")]
    InvalidTranscript(#[from] serde_json::Error),
    #[error("transcript utterance for '{speaker}': {reason}")]
    InvalidUtterance { speaker: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RttmError>;

/// Decimal seconds to rounded milliseconds.
pub fn secs_to_ms(secs: f64) -> u64 {
    (secs * 1000.0).round() as u64
}

/// Milliseconds to decimal seconds.
pub fn ms_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Parse RTTM text into an annotation.
///
/// Only `SPEAKER` records carry diarization turns; other record types are
/// skipped. Zero-duration turns are dropped with a warning since they
/// cannot enter an annotation.
pub fn parse_rttm_str(content: &str) -> Result<Annotation> {
    let mut annotation = Annotation::new();
    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(";;") {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields[0] != "SPEAKER" {
            tracing::debug!(line = line_no, record = fields[0], "skipping non-SPEAKER record");
            continue;
        }
        if fields.len() < 9 {
            return Err(RttmError::Malformed {
                line: line_no,
                reason: format!("expected at least 9 fields, got {}", fields.len()),
            });
        }

        let start_secs: f64 = fields[3].parse().map_err(|_| RttmError::Malformed {
            line: line_no,
            reason: format!("bad turn onset '{}'", fields[3]),
        })?;
        let dur_secs: f64 = fields[4].parse().map_err(|_| RttmError::Malformed {
            line: line_no,
            reason: format!("bad turn duration '{}'", fields[4]),
        })?;
        if !start_secs.is_finite() || start_secs < 0.0 {
            return Err(RttmError::Malformed {
                line: line_no,
                reason: format!("negative turn onset '{}'", fields[3]),
            });
        }
        if !dur_secs.is_finite() || dur_secs < 0.0 {
            return Err(RttmError::Malformed {
                line: line_no,
                reason: format!("negative turn duration '{}'", fields[4]),
            });
        }

        let start_ms = secs_to_ms(start_secs);
        let end_ms = start_ms + secs_to_ms(dur_secs);
        let speaker = fields[7];
        if start_ms == end_ms {
            tracing::warn!(line = line_no, speaker, "skipping zero-duration turn");
            continue;
        }

        annotation
            .add(Segment::new(start_ms, end_ms), speaker)
            .expect("non-empty segment");
    }
    Ok(annotation)
}

pub fn parse_rttm_file(path: &Path) -> Result<Annotation> {
    let content = std::fs::read_to_string(path).map_err(|e| RttmError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    let annotation = parse_rttm_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        turns = annotation.len(),
        speakers = annotation.labels().len(),
        "parsed RTTM"
    );
    Ok(annotation)
}

/// Render an annotation as RTTM lines, the same field layout we parse.
pub fn write_rttm<W: Write>(writer: &mut W, uri: &str, annotation: &Annotation) -> std::io::Result<()> {
    for turn in annotation.iter() {
        writeln!(
            writer,
            "SPEAKER {} 1 {:.3} {:.3} <NA> <NA> {} <NA> <NA>",
            uri,
            ms_to_secs(turn.segment.start_ms),
            ms_to_secs(turn.segment.duration_ms()),
            turn.speaker,
        )?;
    }
    Ok(())
}

pub fn write_rttm_file(path: &Path, uri: &str, annotation: &Annotation) -> Result<()> {
    let file = File::create(path).map_err(|e| RttmError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    write_rttm(&mut writer, uri, annotation).map_err(|e| RttmError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| RttmError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
