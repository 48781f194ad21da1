//! The cumulative-window metric aggregator.

use crate::{EvalError, Result};
use serde::{Deserialize, Serialize};
use whosaid_metrics::DiarizationMetric;
use whosaid_timeline::{Annotation, CropMode, Segment};

/// Window geometry for [`cumulative_curve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Growth of the cumulative window per emitted point.
    pub window_ms: u64,
    /// Loop advancement between scoring rounds.
    pub step_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_ms: 30_000,
            step_ms: 15_000,
        }
    }
}

impl WindowConfig {
    /// Build from decimal seconds, validating before conversion.
    pub fn from_secs(window_secs: f64, step_secs: f64) -> Result<Self> {
        if !(window_secs.is_finite() && window_secs > 0.0) {
            return Err(EvalError::InvalidParameter(format!(
                "window size must be positive, got {window_secs}s"
            )));
        }
        if !(step_secs.is_finite() && step_secs > 0.0) {
            return Err(EvalError::InvalidParameter(format!(
                "step size must be positive, got {step_secs}s"
            )));
        }
        let config = Self {
            window_ms: (window_secs * 1000.0).round() as u64,
            step_ms: (step_secs * 1000.0).round() as u64,
        };
        config.validate()?;
        Ok(config)
    }

    /// A zero step never terminates the aggregation loop and a step larger
    /// than the window leaves coverage gaps, so both are rejected up front.
    pub fn validate(&self) -> Result<()> {
        if self.window_ms == 0 {
            return Err(EvalError::InvalidParameter(
                "window size must be positive".to_string(),
            ));
        }
        if self.step_ms == 0 {
            return Err(EvalError::InvalidParameter(
                "step size must be positive".to_string(),
            ));
        }
        if self.step_ms > self.window_ms {
            return Err(EvalError::InvalidParameter(format!(
                "step ({}ms) must not exceed window ({}ms)",
                self.step_ms, self.window_ms
            )));
        }
        Ok(())
    }
}

/// One point of a metric curve: error after scoring the leading
/// `coverage_pct` percent of the reference speech.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Share of reference speech covered so far, in `(0, 100]`.
    pub coverage_pct: f64,
    /// Metric value over that coverage, as a percentage, `>= 0`.
    pub error_pct: f64,
}

/// Score a hypothesis against a reference over expanding windows.
///
/// Every window starts at time zero; each round extends the end by
/// `step_ms` (capped at the reference speech duration) and re-scores
/// everything from the beginning, so successive points share their
/// prefix. Both annotations are cropped loosely: turns straddling the
/// window boundary are kept whole, not clipped.
///
/// Windows where either cropped side is empty are skipped without
/// emitting a point, so the curve may hold fewer points than
/// `duration / step`. An empty reference yields an empty curve. Scoring
/// errors abort the aggregation and propagate unmodified.
///
/// Coverage percentages are non-decreasing and lie in `(0, 100]`; the
/// final emitted point always covers the full recording.
pub fn cumulative_curve(
    reference: &Annotation,
    hypothesis: &Annotation,
    metric: &dyn DiarizationMetric,
    config: WindowConfig,
) -> Result<Vec<CurvePoint>> {
    config.validate()?;

    let audio_ms = reference.speech_ms();
    if audio_ms == 0 {
        tracing::debug!("empty reference, returning empty curve");
        return Ok(Vec::new());
    }

    let mut points = Vec::new();
    let mut start_ms = 0u64;
    while start_ms < audio_ms {
        let end_ms = (start_ms + config.window_ms).min(audio_ms);
        let window = Segment::new(0, end_ms);

        let reference_window = reference.crop(&window, CropMode::Loose);
        let hypothesis_window = hypothesis.crop(&window, CropMode::Loose);
        if reference_window.is_empty() || hypothesis_window.is_empty() {
            tracing::debug!(end_ms, "window has an empty side, skipping");
        } else {
            let rate = metric.score(&reference_window, &hypothesis_window)?;
            points.push(CurvePoint {
                coverage_pct: end_ms as f64 / audio_ms as f64 * 100.0,
                error_pct: rate * 100.0,
            });
        }

        start_ms += config.step_ms;
    }

    tracing::debug!(metric = metric.name(), points = points.len(), "curve complete");
    Ok(points)
}
