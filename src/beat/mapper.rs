use crate::foundation::core::Fps;
use crate::foundation::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};

/// Bounds for beat-derived transition lengths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeatOpts {
    /// Shortest transition, in frames.
    pub min_transition_frames: u64,
    /// Longest transition, in frames.
    pub max_transition_frames: u64,
    /// Transition used when no usable tempo is known.
    pub default_transition_frames: u64,
}

impl Default for BeatOpts {
    fn default() -> Self {
        Self {
            min_transition_frames: 8,
            max_transition_frames: 18,
            default_transition_frames: 10,
        }
    }
}

impl BeatOpts {
    pub fn validate(&self) -> SyncResult<()> {
        if self.min_transition_frames > self.max_transition_frames {
            return Err(SyncError::validation(
                "beat.min_transition_frames must be <= beat.max_transition_frames",
            ));
        }
        Ok(())
    }
}

/// Frames spanned by one beat at `bpm`.
pub fn frames_per_beat(bpm: f64, fps: Fps) -> f64 {
    (60.0 / bpm) * fps.as_f64()
}

/// Half-beat transition length locked to the tempo, clamped into the configured bounds.
///
/// A missing, non-finite or non-positive `bpm` yields `default_transition_frames` so transition
/// timing degrades instead of blocking composition.
pub fn transition_frames(bpm: Option<f64>, fps: Fps, opts: &BeatOpts) -> u64 {
    let Some(bpm) = bpm.filter(|b| b.is_finite() && *b > 0.0) else {
        return opts.default_transition_frames;
    };
    let half_beat = (frames_per_beat(bpm, fps) / 2.0).round();
    let half_beat = if half_beat.is_finite() {
        half_beat.max(0.0) as u64
    } else {
        opts.max_transition_frames
    };
    half_beat
        .max(opts.min_transition_frames)
        .min(opts.max_transition_frames)
}

/// Map beat timestamps (milliseconds) onto frame numbers.
///
/// The output is strictly increasing: negative or non-finite timestamps are skipped and beats
/// that land on (or before) the previous beat's frame after rounding are merged into it.
pub fn quantize_beats(beat_times_ms: &[f64], fps: Fps) -> Vec<u64> {
    let mut out: Vec<u64> = Vec::with_capacity(beat_times_ms.len());
    for &ms in beat_times_ms {
        if !ms.is_finite() || ms < 0.0 {
            continue;
        }
        let frame = fps.millis_to_frames_round(ms);
        if out.last().is_some_and(|&prev| frame <= prev) {
            continue;
        }
        out.push(frame);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/beat/mapper.rs"]
mod tests;
