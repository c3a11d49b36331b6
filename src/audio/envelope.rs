use crate::foundation::core::Fps;
use crate::foundation::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};

/// Fade timing and hold level for one audio layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerEnvelopeOpts {
    pub fade_in_secs: f64,
    pub fade_out_secs: f64,
    /// Volume held between the fades, in `[0, 1]`.
    pub peak: f32,
}

impl LayerEnvelopeOpts {
    fn validate(&self, layer: &str) -> SyncResult<()> {
        for (name, v) in [
            ("fade_in_secs", self.fade_in_secs),
            ("fade_out_secs", self.fade_out_secs),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SyncError::validation(format!(
                    "envelope.{layer}.{name} must be finite and >= 0"
                )));
            }
        }
        check_volume(&format!("envelope.{layer}.peak"), self.peak)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeOpts {
    /// Music layer when it plays alone.
    pub music: LayerEnvelopeOpts,
    /// Music hold level while narration is present.
    pub ducked_music_peak: f32,
    pub narration: LayerEnvelopeOpts,
}

impl Default for EnvelopeOpts {
    fn default() -> Self {
        Self {
            music: LayerEnvelopeOpts {
                fade_in_secs: 0.5,
                fade_out_secs: 1.0,
                peak: 0.8,
            },
            ducked_music_peak: 0.25,
            narration: LayerEnvelopeOpts {
                fade_in_secs: 0.3,
                fade_out_secs: 0.5,
                peak: 0.9,
            },
        }
    }
}

impl EnvelopeOpts {
    pub fn validate(&self) -> SyncResult<()> {
        self.music.validate("music")?;
        self.narration.validate("narration")?;
        check_volume("envelope.ducked_music_peak", self.ducked_music_peak)
    }
}

fn check_volume(name: &str, v: f32) -> SyncResult<()> {
    if !(0.0..=1.0).contains(&v) {
        return Err(SyncError::validation(format!("{name} must be in [0, 1], got {v}")));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub frame: u64,
    pub volume: f32,
}

/// Piecewise-linear volume curve over timeline frames.
///
/// Breakpoint frames are strictly increasing and every volume lies in `[0, 1]`. Outside the
/// breakpoints the curve holds its first/last value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct VolumeEnvelope {
    points: Vec<Breakpoint>,
}

impl VolumeEnvelope {
    /// Build a validated envelope from explicit breakpoints.
    pub fn new(points: Vec<Breakpoint>) -> SyncResult<Self> {
        if points.is_empty() {
            return Err(SyncError::validation("envelope needs at least one breakpoint"));
        }
        for p in &points {
            check_volume("breakpoint volume", p.volume)?;
        }
        if points.windows(2).any(|w| w[1].frame <= w[0].frame) {
            return Err(SyncError::validation(
                "envelope breakpoint frames must be strictly increasing",
            ));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    /// Volume at a (possibly fractional) frame position.
    pub fn volume_at(&self, frame: f64) -> f32 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        if frame <= first.frame as f64 {
            return first.volume;
        }
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            if frame < b.frame as f64 {
                let t = ((frame - a.frame as f64) / (b.frame - a.frame) as f64) as f32;
                return a.volume + (b.volume - a.volume) * t;
            }
        }
        self.points.last().map_or(0.0, |p| p.volume)
    }

    pub fn peak_volume(&self) -> f32 {
        self.points.iter().map(|p| p.volume).fold(0.0, f32::max)
    }

    /// Frame of the last breakpoint.
    pub fn end_frame(&self) -> u64 {
        self.points.last().map_or(0, |p| p.frame)
    }
}

impl TryFrom<Vec<Breakpoint>> for VolumeEnvelope {
    type Error = SyncError;

    fn try_from(points: Vec<Breakpoint>) -> SyncResult<Self> {
        Self::new(points)
    }
}

impl From<VolumeEnvelope> for Vec<Breakpoint> {
    fn from(env: VolumeEnvelope) -> Self {
        env.points
    }
}

/// Background-music curve: fade in, hold, fade out before `total_frames`.
///
/// With narration present the hold level drops to the ducked peak.
pub fn schedule_music(
    total_frames: u64,
    has_narration: bool,
    fps: Fps,
    opts: &EnvelopeOpts,
) -> VolumeEnvelope {
    let peak = if has_narration {
        opts.ducked_music_peak
    } else {
        opts.music.peak
    };
    fade_hold_fade(total_frames, fps, &opts.music, peak)
}

/// Voiceover curve. Only meaningful when a narration asset exists.
pub fn schedule_narration(total_frames: u64, fps: Fps, opts: &EnvelopeOpts) -> VolumeEnvelope {
    fade_hold_fade(total_frames, fps, &opts.narration, opts.narration.peak)
}

fn fade_hold_fade(total: u64, fps: Fps, layer: &LayerEnvelopeOpts, peak: f32) -> VolumeEnvelope {
    let bp = |frame, volume| Breakpoint { frame, volume };
    let peak = peak.clamp(0.0, 1.0);

    let points = match total {
        0 => vec![bp(0, 0.0)],
        1 => vec![bp(0, 0.0), bp(1, 0.0)],
        _ => {
            let fade_in = fps.secs_to_frames_round(layer.fade_in_secs).max(1);
            let fade_out = fps.secs_to_frames_round(layer.fade_out_secs).max(1);
            if total <= fade_in.saturating_add(1) {
                // Too short for a hold: collapse to a triangle.
                vec![bp(0, 0.0), bp(total / 2, peak), bp(total, 0.0)]
            } else {
                let fade_out_start = total.saturating_sub(fade_out);
                vec![
                    bp(0, 0.0),
                    bp(fade_in, peak),
                    bp((fade_in + 1).max(fade_out_start), peak),
                    bp(total, 0.0),
                ]
            }
        }
    };
    VolumeEnvelope { points }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/envelope.rs"]
mod tests;
