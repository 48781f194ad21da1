//! Greedy speaker-label alignment.

use std::collections::{HashMap, HashSet};
use whosaid_timeline::Annotation;

/// Map hypothesis labels onto reference labels by greedy best overlap.
///
/// Builds the pairwise overlap-duration matrix, then repeatedly binds the
/// (reference, hypothesis) pair with the largest remaining overlap, each
/// label used at most once. Hypothesis labels with no overlapping
/// reference speaker stay unmapped.
///
/// Returns hypothesis label -> reference label. Ties break on label order
/// so the mapping is deterministic.
pub fn greedy_mapping(reference: &Annotation, hypothesis: &Annotation) -> HashMap<String, String> {
    let ref_labels = reference.labels();
    let hyp_labels = hypothesis.labels();

    let mut pairs: Vec<(u64, &str, &str)> = Vec::new();
    for ref_label in &ref_labels {
        let ref_timeline = reference.label_timeline(ref_label);
        for hyp_label in &hyp_labels {
            let overlap_ms = ref_timeline
                .intersection(&hypothesis.label_timeline(hyp_label))
                .duration_ms();
            if overlap_ms > 0 {
                pairs.push((overlap_ms, ref_label, hyp_label));
            }
        }
    }
    // Largest overlap first; label order settles ties.
    pairs.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(b.1)).then(a.2.cmp(b.2)));

    let mut mapping = HashMap::new();
    let mut used_ref: HashSet<&str> = HashSet::new();
    let mut used_hyp: HashSet<&str> = HashSet::new();
    for (overlap_ms, ref_label, hyp_label) in pairs {
        if used_ref.contains(ref_label) || used_hyp.contains(hyp_label) {
            continue;
        }
        tracing::debug!(ref_label, hyp_label, overlap_ms, "bound speaker pair");
        used_ref.insert(ref_label);
        used_hyp.insert(hyp_label);
        mapping.insert(hyp_label.to_string(), ref_label.to_string());
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use whosaid_timeline::Segment;

    fn annotation(turns: &[(u64, u64, &str)]) -> Annotation {
        let mut ann = Annotation::new();
        for &(start_ms, end_ms, speaker) in turns {
            ann.add(Segment::new(start_ms, end_ms), speaker).unwrap();
        }
        ann
    }

    #[test]
    fn test_maps_best_overlap() {
        let reference = annotation(&[(0, 10_000, "alice"), (10_000, 20_000, "bob")]);
        let hypothesis = annotation(&[(0, 9_000, "spk1"), (9_000, 20_000, "spk2")]);

        let mapping = greedy_mapping(&reference, &hypothesis);
        assert_eq!(mapping.get("spk1").map(String::as_str), Some("alice"));
        assert_eq!(mapping.get("spk2").map(String::as_str), Some("bob"));
    }

    #[test]
    fn test_each_label_bound_once() {
        // Both hypothesis speakers overlap alice most; only one gets her.
        let reference = annotation(&[(0, 10_000, "alice"), (18_000, 20_000, "bob")]);
        let hypothesis = annotation(&[(0, 6_000, "spk1"), (6_000, 10_000, "spk2")]);

        let mapping = greedy_mapping(&reference, &hypothesis);
        assert_eq!(mapping.get("spk1").map(String::as_str), Some("alice"));
        assert_eq!(mapping.get("spk2"), None);
    }

    #[test]
    fn test_no_overlap_no_mapping() {
        let reference = annotation(&[(0, 1_000, "alice")]);
        let hypothesis = annotation(&[(5_000, 6_000, "spk1")]);
        assert!(greedy_mapping(&reference, &hypothesis).is_empty());
    }

    #[test]
    fn test_deterministic_on_ties() {
        let reference = annotation(&[(0, 1_000, "alice"), (0, 1_000, "bob")]);
        let hypothesis = annotation(&[(0, 1_000, "spk1")]);

        let first = greedy_mapping(&reference, &hypothesis);
        for _ in 0..10 {
            assert_eq!(greedy_mapping(&reference, &hypothesis), first);
        }
        // Tie on overlap resolves to the lexicographically first reference.
        assert_eq!(first.get("spk1").map(String::as_str), Some("alice"));
    }
}
