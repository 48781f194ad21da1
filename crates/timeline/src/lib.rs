//! Time segments, timelines, and speaker-labeled annotations.
//!
//! All timestamps are `u64` milliseconds. Segments are half-open ranges
//! `[start_ms, end_ms)`, so two segments that merely touch do not overlap.

mod annotation;

pub use annotation::{Annotation, CropMode, Turn};

#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("empty segment at {start_ms}ms")]
    EmptySegment { start_ms: u64 },
}

pub type Result<T> = std::result::Result<T, TimelineError>;

/// Half-open time range `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Segment {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    pub fn is_empty(&self) -> bool {
        self.end_ms <= self.start_ms
    }

    /// True if the two ranges share any time. Touching endpoints do not
    /// count since ranges are half-open.
    pub fn intersects(&self, other: &Segment) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }

    pub fn intersection(&self, other: &Segment) -> Option<Segment> {
        let start_ms = self.start_ms.max(other.start_ms);
        let end_ms = self.end_ms.min(other.end_ms);
        if start_ms < end_ms {
            Some(Segment { start_ms, end_ms })
        } else {
            None
        }
    }

    pub fn covers(&self, other: &Segment) -> bool {
        self.start_ms <= other.start_ms && other.end_ms <= self.end_ms
    }
}

/// Ordered set of unlabeled segments.
///
/// Segments are kept sorted by (start, end). Overlap between stored
/// segments is allowed; [`Timeline::support`] collapses it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a segment, keeping sort order. Empty segments are ignored.
    pub fn add(&mut self, segment: Segment) {
        if segment.is_empty() {
            return;
        }
        let idx = self.segments.partition_point(|s| *s <= segment);
        self.segments.insert(idx, segment);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Minimal non-overlapping cover: overlapping or touching segments are
    /// merged into one.
    pub fn support(&self) -> Timeline {
        let mut merged: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            match merged.last_mut() {
                Some(last) if seg.start_ms <= last.end_ms => {
                    last.end_ms = last.end_ms.max(seg.end_ms);
                }
                _ => merged.push(*seg),
            }
        }
        Timeline { segments: merged }
    }

    /// Total covered time, counting overlapping stretches once.
    pub fn duration_ms(&self) -> u64 {
        self.support().segments.iter().map(Segment::duration_ms).sum()
    }

    /// Smallest segment containing every stored segment.
    pub fn extent(&self) -> Option<Segment> {
        let start_ms = self.segments.first()?.start_ms;
        let end_ms = self.segments.iter().map(|s| s.end_ms).max()?;
        Some(Segment { start_ms, end_ms })
    }

    /// Time covered by both timelines.
    pub fn intersection(&self, other: &Timeline) -> Timeline {
        let a = self.support();
        let b = other.support();
        let mut segments = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.segments.len() && j < b.segments.len() {
            if let Some(seg) = a.segments[i].intersection(&b.segments[j]) {
                segments.push(seg);
            }
            if a.segments[i].end_ms <= b.segments[j].end_ms {
                i += 1;
            } else {
                j += 1;
            }
        }
        Timeline { segments }
    }

    /// Time covered by either timeline, de-overlapped.
    pub fn union(&self, other: &Timeline) -> Timeline {
        let mut combined = self.clone();
        for seg in other.iter() {
            combined.add(*seg);
        }
        combined.support()
    }
}

impl FromIterator<Segment> for Timeline {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        let mut timeline = Timeline::new();
        for seg in iter {
            timeline.add(seg);
        }
        timeline
    }
}
