//! Evaluation reports and the evaluator service.

use crate::{cumulative_curve, CurvePoint, Result, WindowConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use whosaid_metrics::{DerComponents, DerMetric, DiarizationMetric, JerMetric};
use whosaid_timeline::Annotation;

/// One metric's cumulative curve plus its whole-recording score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricCurve {
    pub metric: String,
    pub points: Vec<CurvePoint>,
    /// Score over the full, unwindowed annotations, as a percentage.
    /// Absent when either side is empty.
    pub overall_pct: Option<f64>,
}

/// Result of evaluating one recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub id: Uuid,
    /// Recording identifier, as used in the RTTM uri field.
    pub uri: String,
    pub created_at: DateTime<Utc>,
    pub window: WindowConfig,
    pub curves: Vec<MetricCurve>,
    /// Whole-recording DER breakdown; absent when either side is empty.
    pub der: Option<DerComponents>,
}

/// Repository trait for report persistence.
/// Implemented by the storage layer, keeping evaluation decoupled from it.
pub trait EvalReportRepository: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn save(&self, report: &EvalReport) -> std::result::Result<(), Self::Error>;
    fn get(&self, id: &Uuid) -> std::result::Result<EvalReport, Self::Error>;
    fn list(&self) -> std::result::Result<Vec<EvalReport>, Self::Error>;
    fn delete(&self, id: &Uuid) -> std::result::Result<(), Self::Error>;
}

/// Runs a set of injected metrics over a (reference, hypothesis) pair.
///
/// Metrics are passed in rather than constructed here so tests can
/// substitute deterministic fakes for the real scorers.
pub struct Evaluator {
    config: WindowConfig,
    metrics: Vec<Box<dyn DiarizationMetric>>,
}

impl Evaluator {
    pub fn new(config: WindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: Vec::new(),
        })
    }

    pub fn with_metric(mut self, metric: Box<dyn DiarizationMetric>) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Evaluator with the standard DER and JER scorers.
    pub fn standard(config: WindowConfig) -> Result<Self> {
        Ok(Self::new(config)?
            .with_metric(Box::new(DerMetric::new()))
            .with_metric(Box::new(JerMetric::new())))
    }

    pub fn config(&self) -> WindowConfig {
        self.config
    }

    /// Produce curves for every configured metric, the whole-recording
    /// score per metric, and the detailed DER breakdown.
    ///
    /// An empty reference is a degenerate success: curves come back empty
    /// and overall scores absent.
    pub fn evaluate(
        &self,
        uri: &str,
        reference: &Annotation,
        hypothesis: &Annotation,
    ) -> Result<EvalReport> {
        let scorable = !reference.is_empty() && !hypothesis.is_empty();

        let mut curves = Vec::with_capacity(self.metrics.len());
        for metric in &self.metrics {
            let points = cumulative_curve(reference, hypothesis, metric.as_ref(), self.config)?;
            let overall_pct = if scorable {
                Some(metric.score(reference, hypothesis)? * 100.0)
            } else {
                None
            };
            tracing::info!(
                uri,
                metric = metric.name(),
                points = points.len(),
                overall_pct,
                "metric evaluated"
            );
            curves.push(MetricCurve {
                metric: metric.name().to_string(),
                points,
                overall_pct,
            });
        }

        let der = if scorable {
            Some(DerMetric::new().components(reference, hypothesis)?)
        } else {
            None
        };

        Ok(EvalReport {
            id: Uuid::new_v4(),
            uri: uri.to_string(),
            created_at: Utc::now(),
            window: self.config,
            curves,
            der,
        })
    }
}
