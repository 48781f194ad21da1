//! Jaccard Error Rate.

use crate::mapping::greedy_mapping;
use crate::{check_nonempty, DiarizationMetric, Result};
use std::collections::HashMap;
use whosaid_timeline::Annotation;

/// Jaccard Error Rate: per-speaker Jaccard distance between each reference
/// speaker's timeline and its aligned hypothesis speaker's timeline,
/// averaged over reference speakers.
///
/// Unlike DER this weights every speaker equally, so it surfaces systems
/// that trade away minority speakers for the dominant one.
#[derive(Debug, Clone, Copy, Default)]
pub struct JerMetric;

impl JerMetric {
    pub fn new() -> Self {
        Self
    }
}

impl DiarizationMetric for JerMetric {
    fn name(&self) -> &'static str {
        "jer"
    }

    fn score(&self, reference: &Annotation, hypothesis: &Annotation) -> Result<f64> {
        check_nonempty(reference, hypothesis)?;

        // hypothesis -> reference, inverted to look up each reference
        // speaker's partner. Greedy mapping binds each side at most once.
        let mapping = greedy_mapping(reference, hypothesis);
        let ref_to_hyp: HashMap<&str, &str> = mapping
            .iter()
            .map(|(hyp_label, ref_label)| (ref_label.as_str(), hyp_label.as_str()))
            .collect();

        let labels = reference.labels();
        let mut sum = 0.0;
        for ref_label in &labels {
            let speaker_jer = match ref_to_hyp.get(ref_label) {
                None => 1.0,
                Some(hyp_label) => {
                    let ref_timeline = reference.label_timeline(ref_label);
                    let hyp_timeline = hypothesis.label_timeline(hyp_label);
                    let inter_ms = ref_timeline.intersection(&hyp_timeline).duration_ms();
                    let union_ms = ref_timeline.union(&hyp_timeline).duration_ms();
                    1.0 - inter_ms as f64 / union_ms as f64
                }
            };
            sum += speaker_jer;
        }
        Ok(sum / labels.len() as f64)
    }
}
