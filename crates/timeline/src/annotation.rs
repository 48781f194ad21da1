//! Speaker-labeled annotations.

use crate::{Result, Segment, Timeline, TimelineError};
use std::collections::BTreeSet;

/// One labeled interval: a speaker talking over a segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Turn {
    pub segment: Segment,
    pub speaker: String,
}

/// How [`Annotation::crop`] treats turns that straddle the crop window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropMode {
    /// Keep any turn overlapping the window, untruncated.
    Loose,
    /// Keep only turns fully contained in the window.
    Strict,
}

/// A speaker-labeled timeline: who spoke when, from one party's point of
/// view (ground truth or system output).
///
/// A speaker may own any number of turns; turns of different speakers may
/// overlap (simultaneous speech). Turns are kept sorted by
/// (start, end, speaker) for deterministic iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    turns: Vec<Turn>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn. Zero-duration segments are rejected.
    pub fn add(&mut self, segment: Segment, speaker: impl Into<String>) -> Result<()> {
        if segment.is_empty() {
            return Err(TimelineError::EmptySegment {
                start_ms: segment.start_ms,
            });
        }
        let turn = Turn {
            segment,
            speaker: speaker.into(),
        };
        let idx = self.turns.partition_point(|t| *t <= turn);
        self.turns.insert(idx, turn);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Speaker labels in lexicographic order.
    pub fn labels(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.turns.iter().map(|t| t.speaker.as_str()).collect();
        set.into_iter().collect()
    }

    /// All turns of one speaker as an unlabeled timeline.
    pub fn label_timeline(&self, speaker: &str) -> Timeline {
        self.turns
            .iter()
            .filter(|t| t.speaker == speaker)
            .map(|t| t.segment)
            .collect()
    }

    /// Union of all turns, de-overlapped.
    pub fn support(&self) -> Timeline {
        self.turns.iter().map(|t| t.segment).collect::<Timeline>().support()
    }

    /// Total speech time, counting overlapping speech once.
    ///
    /// This is the normalization denominator for coverage percentages.
    pub fn speech_ms(&self) -> u64 {
        self.support().duration_ms()
    }

    /// Plain sum of turn durations, overlap counted multiply.
    pub fn raw_speech_ms(&self) -> u64 {
        self.turns.iter().map(|t| t.segment.duration_ms()).sum()
    }

    pub fn extent(&self) -> Option<Segment> {
        self.turns.iter().map(|t| t.segment).collect::<Timeline>().extent()
    }

    /// Restrict to a time window.
    ///
    /// `Loose` keeps straddling turns whole rather than clipping them to
    /// the window boundary.
    pub fn crop(&self, window: &Segment, mode: CropMode) -> Annotation {
        let turns = self
            .turns
            .iter()
            .filter(|t| match mode {
                CropMode::Loose => t.segment.intersects(window),
                CropMode::Strict => window.covers(&t.segment),
            })
            .cloned()
            .collect();
        Annotation { turns }
    }
}
