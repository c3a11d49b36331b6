use crate::audio::envelope::{VolumeEnvelope, schedule_music, schedule_narration};
use crate::beat::mapper::transition_frames;
use crate::beat::track::{BeatTrack, TempoData, resolve_bpm};
use crate::config::EngineConfig;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{SyncError, SyncResult};
use crate::normalize::pass::{NormalizeWarning, Normalized};
use crate::storyboard::model::Storyboard;
use crate::timeline::compose::{Timeline, compose};
use crate::timeline::fingerprint::TimelineFingerprint;
use serde::Serialize;
use std::fmt;

/// How the upstream music-generation job ended.
///
/// Planning only starts once this is known, so a slow job holds composition back instead of racing
/// it.
#[derive(Clone, Debug, PartialEq)]
pub enum AudioOutcome {
    /// A track was produced. `tempo` is absent when estimation failed.
    Generated {
        track_file: String,
        tempo: Option<TempoData>,
    },
    TimedOut,
    Failed(String),
    /// No generation was attempted.
    Skipped,
}

impl AudioOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Generated { .. } => "generated",
            Self::TimedOut => "timed-out",
            Self::Failed(_) => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for AudioOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            other => f.write_str(other.status()),
        }
    }
}

/// Where a layer's audio comes from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioSource {
    Track { path: String },
    /// Static placeholder shipped with the renderer.
    Fallback { path: String },
}

impl AudioSource {
    pub fn path(&self) -> &str {
        match self {
            Self::Track { path } | Self::Fallback { path } => path,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AudioLayer {
    pub source: AudioSource,
    pub envelope: VolumeEnvelope,
}

/// Everything the renderer needs for one video: the storyboard, its frame layout and the audio
/// layers timed against it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPlan {
    pub fps: Fps,
    pub canvas: Canvas,
    pub storyboard: Storyboard,
    pub timeline: Timeline,
    /// Tempo the transitions were locked to; `None` when the default length was used.
    pub transition_bpm: Option<f64>,
    /// Beat frames inside `[0, total_frames)`.
    pub beats: Vec<u64>,
    pub music: AudioLayer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<AudioLayer>,
    pub warnings: Vec<NormalizeWarning>,
    pub fingerprint: TimelineFingerprint,
}

impl SyncPlan {
    pub fn total_frames(&self) -> u64 {
        self.timeline.total_frames
    }
}

/// Assemble the render contract from a normalized storyboard and a settled audio job.
///
/// A generated track locks transitions to its tempo (detected if plausible, planned otherwise).
/// Any other outcome falls back to the default transition length and the placeholder music asset.
/// Narration gets its own layer, and ducks the music, only when the storyboard names a narration
/// file.
#[tracing::instrument(
    skip_all,
    fields(scenes = normalized.storyboard.scenes.len(), audio = audio.status())
)]
pub fn build_plan(
    normalized: Normalized,
    audio: AudioOutcome,
    cfg: &EngineConfig,
) -> SyncResult<SyncPlan> {
    cfg.validate()?;
    let Normalized {
        storyboard,
        warnings,
    } = normalized;
    let fps = cfg.fps;

    let (music_source, bpm, beat_track) = match audio {
        AudioOutcome::Generated { track_file, tempo } => {
            let bpm = resolve_bpm(
                tempo.as_ref(),
                storyboard.bpm,
                cfg.normalize.bpm_min,
                cfg.normalize.bpm_max,
            );
            let beats = tempo
                .as_ref()
                .map(|t| BeatTrack::from_tempo(t, fps))
                .unwrap_or_default();
            (AudioSource::Track { path: track_file }, Some(bpm), beats)
        }
        other => {
            tracing::warn!(
                outcome = %other,
                fallback = %cfg.fallback_music_asset,
                "no generated music; using fallback asset and default transitions"
            );
            (
                AudioSource::Fallback {
                    path: cfg.fallback_music_asset.clone(),
                },
                None,
                BeatTrack::default(),
            )
        }
    };

    let tf = transition_frames(bpm, fps, &cfg.beat);
    let tf = i64::try_from(tf)
        .map_err(|_| SyncError::composition(format!("transition length {tf} is out of range")))?;
    let timeline = compose(&storyboard, tf)?;
    let total = timeline.total_frames;

    let beats = beat_track.beats_before(total).to_vec();

    let narration = storyboard.narration_track_file.clone().map(|path| AudioLayer {
        source: AudioSource::Track { path },
        envelope: schedule_narration(total, fps, &cfg.envelope),
    });
    if narration.is_none() && storyboard.has_narration_script() {
        tracing::debug!("narration script present but no narration track; music is not ducked");
    }
    let music = AudioLayer {
        source: music_source,
        envelope: schedule_music(total, narration.is_some(), fps, &cfg.envelope),
    };

    let fingerprint = timeline.fingerprint();
    tracing::info!(
        total_frames = total,
        transition_frames = timeline.transition_frames,
        beats = beats.len(),
        narration = narration.is_some(),
        %fingerprint,
        "sync plan ready: {}",
        storyboard.summary(fps),
    );

    Ok(SyncPlan {
        fps,
        canvas: cfg.canvas,
        storyboard,
        timeline,
        transition_bpm: bpm,
        beats,
        music,
        narration,
        warnings,
        fingerprint,
    })
}

#[cfg(test)]
#[path = "../tests/unit/plan.rs"]
mod tests;
