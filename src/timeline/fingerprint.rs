use crate::foundation::core::FrameRange;
use crate::timeline::compose::{Segment, Timeline};
use crate::timeline::transitions::{Direction, TransitionStyle};
use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x5d3c_71a9_e04b_b826;

/// 128-bit layout digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl fmt::Display for TimelineFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

pub(crate) fn fingerprint_timeline(timeline: &Timeline) -> TimelineFingerprint {
    let mut h = StableHasher::new();
    h.write_u64(timeline.transition_frames);
    h.write_u64(timeline.total_frames);
    h.write_u32(timeline.segments.len() as u32);
    for seg in &timeline.segments {
        write_segment(&mut h, seg);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> TimelineFingerprint {
        let v = self.inner.digest128();
        TimelineFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_segment(h: &mut StableHasher, seg: &Segment) {
    match seg {
        Segment::Content {
            scene_index,
            kind,
            range,
        } => {
            h.write_u8(0);
            h.write_u64(*scene_index as u64);
            h.write_str(kind.as_str());
            write_range(h, *range);
        }
        Segment::Transition {
            style,
            from_kind,
            to_kind,
            range,
        } => {
            h.write_u8(1);
            write_style(h, *style);
            h.write_str(from_kind.as_str());
            h.write_str(to_kind.as_str());
            write_range(h, *range);
        }
    }
}

fn write_style(h: &mut StableHasher, style: TransitionStyle) {
    match style {
        TransitionStyle::Fade => h.write_u8(0),
        TransitionStyle::Wipe { direction } => {
            h.write_u8(1);
            write_direction(h, direction);
        }
        TransitionStyle::Slide { direction } => {
            h.write_u8(2);
            write_direction(h, direction);
        }
    }
}

fn write_direction(h: &mut StableHasher, d: Direction) {
    h.write_u8(match d {
        Direction::FromLeft => 0,
        Direction::FromRight => 1,
        Direction::FromTop => 2,
        Direction::FromBottom => 3,
    });
}

fn write_range(h: &mut StableHasher, r: FrameRange) {
    h.write_u64(r.start.0);
    h.write_u64(r.end.0);
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/fingerprint.rs"]
mod tests;
