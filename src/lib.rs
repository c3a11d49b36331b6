//! Beatline lays out planner-generated promo storyboards on a frame axis and times their audio
//! against it.
//!
//! A run goes through four stages, each a pure function of its inputs plus an [`EngineConfig`]:
//!
//! - [`normalize`] repairs an untrusted [`StoryboardDef`] into a [`Storyboard`]
//! - [`transition_frames`] derives a beat-locked transition length from the track tempo
//! - [`compose`] builds the [`Timeline`], overlapping adjacent scenes by that length
//! - [`schedule_music`] / [`schedule_narration`] derive [`VolumeEnvelope`]s from the total length
//!
//! [`build_plan`] chains them once the upstream music job has settled into an [`AudioOutcome`].
#![forbid(unsafe_code)]

mod foundation;

/// Volume envelopes and their application to PCM.
pub mod audio;
/// Tempo handling: transition lengths and beat quantization.
pub mod beat;
pub mod config;
/// Storyboard validation and repair.
pub mod normalize;
pub mod plan;
/// Boundary and normalized storyboard model.
pub mod storyboard;
/// Frame-axis layout of scenes and transitions.
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{SyncError, SyncResult};

pub use crate::audio::envelope::{
    Breakpoint, EnvelopeOpts, VolumeEnvelope, schedule_music, schedule_narration,
};
pub use crate::audio::gain::apply_envelope;
pub use crate::beat::mapper::{BeatOpts, quantize_beats, transition_frames};
pub use crate::beat::track::{BeatTrack, TempoData, resolve_bpm};
pub use crate::config::EngineConfig;
pub use crate::normalize::pass::{NormalizeOpts, NormalizeWarning, Normalized, normalize};
pub use crate::plan::{AudioLayer, AudioOutcome, AudioSource, SyncPlan, build_plan};
pub use crate::storyboard::model::{Storyboard, StoryboardDef};
pub use crate::storyboard::mood::AudioMood;
pub use crate::storyboard::scene::{Scene, SceneContent, SceneKind};
pub use crate::storyboard::theme::{ColorTheme, HexColor};
pub use crate::timeline::compose::{Segment, Timeline, compose};
pub use crate::timeline::transitions::{Direction, TransitionStyle};
