//! Diarization Error Rate.

use crate::mapping::greedy_mapping;
use crate::{check_nonempty, DiarizationMetric, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use whosaid_timeline::{Annotation, Segment};

/// Duration-weighted DER breakdown.
///
/// `total_ms` is reference speech time counting simultaneous speakers
/// multiply, the standard DER denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerComponents {
    pub total_ms: u64,
    pub correct_ms: u64,
    pub missed_ms: u64,
    pub false_alarm_ms: u64,
    pub confusion_ms: u64,
}

impl DerComponents {
    /// Misattributed time: missed + false alarm + confusion.
    pub fn error_ms(&self) -> u64 {
        self.missed_ms + self.false_alarm_ms + self.confusion_ms
    }

    /// DER as a fraction. Exceeds 1.0 when the hypothesis fabricates more
    /// speech than the reference contains.
    pub fn rate(&self) -> f64 {
        if self.total_ms == 0 {
            return 0.0;
        }
        self.error_ms() as f64 / self.total_ms as f64
    }
}

/// Diarization Error Rate: fraction of reference speech time that is
/// missed, falsely detected, or attributed to the wrong speaker.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerMetric;

impl DerMetric {
    pub fn new() -> Self {
        Self
    }

    /// Full component breakdown for one (reference, hypothesis) pair.
    ///
    /// Hypothesis labels are greedily aligned to reference labels, then
    /// the merged set of turn boundaries is swept. Between two adjacent
    /// boundaries the active speaker sets are constant, so each region
    /// contributes its duration times a speaker count to each component.
    pub fn components(
        &self,
        reference: &Annotation,
        hypothesis: &Annotation,
    ) -> Result<DerComponents> {
        check_nonempty(reference, hypothesis)?;
        let mapping = greedy_mapping(reference, hypothesis);

        let mut bounds: Vec<u64> = reference
            .iter()
            .chain(hypothesis.iter())
            .flat_map(|t| [t.segment.start_ms, t.segment.end_ms])
            .collect();
        bounds.sort_unstable();
        bounds.dedup();

        let mut acc = DerComponents::default();
        for pair in bounds.windows(2) {
            let region = Segment::new(pair[0], pair[1]);
            let dur = region.duration_ms();

            // Boundaries include every turn endpoint, so a turn either
            // covers the whole region or misses it entirely.
            let ref_active: HashSet<&str> = reference
                .iter()
                .filter(|t| t.segment.covers(&region))
                .map(|t| t.speaker.as_str())
                .collect();
            let hyp_active: HashSet<&str> = hypothesis
                .iter()
                .filter(|t| t.segment.covers(&region))
                .map(|t| t.speaker.as_str())
                .collect();

            let n_ref = ref_active.len() as u64;
            let n_hyp = hyp_active.len() as u64;
            if n_ref == 0 && n_hyp == 0 {
                continue;
            }

            let mapped: HashSet<&str> = hyp_active
                .iter()
                .filter_map(|h| mapping.get(*h))
                .map(String::as_str)
                .collect();
            let correct = ref_active.intersection(&mapped).count() as u64;

            acc.total_ms += dur * n_ref;
            acc.correct_ms += dur * correct;
            acc.missed_ms += dur * n_ref.saturating_sub(n_hyp);
            acc.false_alarm_ms += dur * n_hyp.saturating_sub(n_ref);
            acc.confusion_ms += dur * (n_ref.min(n_hyp) - correct);
        }

        tracing::debug!(
            total_ms = acc.total_ms,
            missed_ms = acc.missed_ms,
            false_alarm_ms = acc.false_alarm_ms,
            confusion_ms = acc.confusion_ms,
            "computed DER components"
        );
        Ok(acc)
    }
}

impl DiarizationMetric for DerMetric {
    fn name(&self) -> &'static str {
        "der"
    }

    fn score(&self, reference: &Annotation, hypothesis: &Annotation) -> Result<f64> {
        Ok(self.components(reference, hypothesis)?.rate())
    }
}
