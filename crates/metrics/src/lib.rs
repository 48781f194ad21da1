//! Diarization error metrics.
//!
//! Scores a hypothesis annotation (system output) against a reference
//! annotation (ground truth). Both metrics first align hypothesis speaker
//! labels to reference labels by greedy best-overlap matching, so the two
//! sides may use unrelated label vocabularies.

mod der;
mod jer;
pub mod mapping;

pub use der::{DerComponents, DerMetric};
pub use jer::JerMetric;

use whosaid_timeline::Annotation;

#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    #[error("reference annotation is empty")]
    EmptyReference,
    #[error("hypothesis annotation is empty")]
    EmptyHypothesis,
}

pub type Result<T> = std::result::Result<T, MetricError>;

/// A scoring oracle: one error-rate figure for a (reference, hypothesis)
/// pair.
///
/// `score` returns the error as a fraction, `>= 0.0` and not capped at
/// `1.0` (DER exceeds 1.0 when the hypothesis adds more speech than the
/// reference contains). Implementations must be pure so repeated calls
/// with the same inputs agree.
pub trait DiarizationMetric: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, reference: &Annotation, hypothesis: &Annotation) -> Result<f64>;
}

fn check_nonempty(reference: &Annotation, hypothesis: &Annotation) -> Result<()> {
    if reference.is_empty() {
        return Err(MetricError::EmptyReference);
    }
    if hypothesis.is_empty() {
        return Err(MetricError::EmptyHypothesis);
    }
    Ok(())
}
