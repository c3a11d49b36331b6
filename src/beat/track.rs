use crate::beat::mapper::quantize_beats;
use crate::foundation::core::Fps;
use crate::foundation::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Tempo estimate for a generated music track, as reported by the tempo estimator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoData {
    pub bpm: f64,
    /// Beat timestamps in milliseconds from the start of the track.
    #[serde(default, alias = "beatTimes")]
    pub beat_times_ms: Vec<f64>,
}

impl TempoData {
    /// Parse tempo data from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SyncResult<Self> {
        serde_json::from_reader(r).map_err(|e| SyncError::serde(format!("parse tempo JSON: {e}")))
    }

    /// Parse tempo data from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SyncError::serde(format!("open tempo JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// The estimated tempo when it is finite and inside `[min, max]`.
    pub fn bpm_in_band(&self, min: f64, max: f64) -> Option<f64> {
        (self.bpm.is_finite() && (min..=max).contains(&self.bpm)).then_some(self.bpm)
    }
}

/// Tempo that drives transition length for a generated track.
///
/// A detected tempo inside `[min_bpm, max_bpm]` wins; otherwise the storyboard's planned tempo is
/// used.
pub fn resolve_bpm(
    detected: Option<&TempoData>,
    planned_bpm: f64,
    min_bpm: f64,
    max_bpm: f64,
) -> f64 {
    match detected.and_then(|t| t.bpm_in_band(min_bpm, max_bpm)) {
        Some(bpm) => bpm,
        None => {
            if let Some(t) = detected {
                tracing::debug!(
                    detected = t.bpm,
                    planned = planned_bpm,
                    "detected tempo out of band"
                );
            }
            planned_bpm
        }
    }
}

/// Tempo plus frame-quantized beat positions.
///
/// `beat_frames` is strictly increasing and may be empty when detection found no beats.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BeatTrackDef")]
pub struct BeatTrack {
    pub bpm: Option<f64>,
    pub beat_frames: Vec<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BeatTrackDef {
    #[serde(default)]
    bpm: Option<f64>,
    #[serde(default)]
    beat_frames: Vec<u64>,
}

impl TryFrom<BeatTrackDef> for BeatTrack {
    type Error = SyncError;

    fn try_from(def: BeatTrackDef) -> SyncResult<Self> {
        if def.beat_frames.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SyncError::validation(
                "beat track frames must be strictly increasing",
            ));
        }
        Ok(Self {
            bpm: def.bpm,
            beat_frames: def.beat_frames,
        })
    }
}

impl BeatTrack {
    /// Quantize detected beats at `fps`.
    pub fn from_tempo(tempo: &TempoData, fps: Fps) -> Self {
        Self {
            bpm: Some(tempo.bpm).filter(|b| b.is_finite() && *b > 0.0),
            beat_frames: quantize_beats(&tempo.beat_times_ms, fps),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.beat_frames.is_empty()
    }

    /// Beats strictly before `end_frame`.
    pub fn beats_before(&self, end_frame: u64) -> &[u64] {
        let n = self.beat_frames.partition_point(|&b| b < end_frame);
        &self.beat_frames[..n]
    }

    /// Beat closest to `frame`; ties resolve to the earlier beat.
    pub fn nearest_beat(&self, frame: u64) -> Option<u64> {
        let i = self.beat_frames.partition_point(|&b| b < frame);
        let after = self.beat_frames.get(i).copied();
        let before = i.checked_sub(1).map(|j| self.beat_frames[j]);
        match (before, after) {
            (Some(b), Some(a)) => {
                Some(if frame.abs_diff(b) <= a.abs_diff(frame) { b } else { a })
            }
            (b, a) => b.or(a),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/beat/track.rs"]
mod tests;
