use crate::foundation::core::Fps;
use crate::foundation::error::{SyncError, SyncResult};
use crate::storyboard::mood::AudioMood;
use crate::storyboard::scene::{Scene, SceneKind};
use crate::storyboard::theme::ColorTheme;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ----------------------------
// Boundary (as produced by the planner)
// ----------------------------

/// Storyboard exactly as the planning collaborator emitted it.
///
/// Every field is optional here so that presence checks happen in normalization with a useful
/// message instead of an opaque parse failure. Scenes stay untyped JSON until normalization
/// decides which ones are content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardDef {
    #[serde(default)]
    pub scenes: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub color_theme: Option<ColorThemeDef>,
    #[serde(default)]
    pub audio_mood: Option<String>,
    #[serde(default, alias = "audioBpm")]
    pub bpm: Option<f64>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub audio_track_file: Option<String>,
    #[serde(default)]
    pub narration_track_file: Option<String>,
    #[serde(default)]
    pub audio_prompt: Option<String>,
    #[serde(default)]
    pub audio_lyrics: Option<String>,
    #[serde(default)]
    pub narration_script: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorThemeDef {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub text_secondary: Option<String>,
}

impl StoryboardDef {
    /// Parse a raw storyboard from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SyncResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SyncError::validation(format!("parse storyboard JSON: {e}")))
    }

    /// Parse a raw storyboard from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SyncError::validation(format!("open storyboard JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse a raw storyboard from an already-decoded JSON value.
    pub fn from_value(v: serde_json::Value) -> SyncResult<Self> {
        serde_json::from_value(v)
            .map_err(|e| SyncError::validation(format!("parse storyboard JSON: {e}")))
    }
}

// ----------------------------
// Normalized
// ----------------------------

/// Validated storyboard: content scenes only, sanitized tempo, completed theme and creative
/// fields. Produced once per run and handed to the renderer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storyboard {
    /// Content scenes in narrative order.
    pub scenes: Vec<Scene>,
    pub color_theme: ColorTheme,
    pub audio_mood: AudioMood,
    /// Planned tempo, always inside the configured band.
    pub bpm: f64,
    pub product_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_track_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration_track_file: Option<String>,
    /// Music-generation brief.
    pub audio_prompt: String,
    pub audio_lyrics: String,
    /// Voiceover script; empty means "no narration".
    #[serde(default)]
    pub narration_script: String,
}

impl Storyboard {
    /// Sum of all scene durations, before transition overlap.
    pub fn content_frames(&self) -> u64 {
        self.scenes
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.duration_in_frames))
    }

    /// Scene kinds in narrative order.
    pub fn kinds(&self) -> Vec<SceneKind> {
        self.scenes.iter().map(Scene::kind).collect()
    }

    /// Whether the planner supplied a voiceover script.
    pub fn has_narration_script(&self) -> bool {
        !self.narration_script.is_empty()
    }

    /// Narrative arc, e.g. `hook → problem → cta`.
    pub fn narrative(&self) -> String {
        self.scenes
            .iter()
            .map(|s| s.kind().as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// One-line summary, e.g. `hook → problem → cta (190 frames, 6.3s)`.
    pub fn summary(&self, fps: Fps) -> String {
        let frames = self.content_frames();
        format!(
            "{} ({frames} frames, {:.1}s)",
            self.narrative(),
            fps.frames_to_secs(frames)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storyboard/model.rs"]
mod tests;
