//! Windowed diarization evaluation.
//!
//! Scores a hypothesis against a reference over cumulative windows:
//! expanding ranges always anchored at time zero, advanced by a fixed
//! step. The curve shows how an error metric settles as more of the
//! recording is taken into account, where disjoint windows would only
//! show local-segment noise.

mod curve;
mod report;

pub use curve::{cumulative_curve, CurvePoint, WindowConfig};
pub use report::{EvalReport, EvalReportRepository, Evaluator, MetricCurve};

use whosaid_metrics::MetricError;

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("scoring failed: {0}")]
    Scoring(#[from] MetricError),
}

pub type Result<T> = std::result::Result<T, EvalError>;
