use crate::audio::envelope::EnvelopeOpts;
use crate::beat::mapper::BeatOpts;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{SyncError, SyncResult};
use crate::normalize::pass::NormalizeOpts;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Engine-wide settings, fixed for a run and passed explicitly to each stage.
///
/// Every field defaults to the reference constants, so a JSON file only needs the values it
/// overrides:
///
/// ```json
/// { "fps": { "num": 25, "den": 1 }, "normalize": { "scale_target_frames": 450 } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fps: Fps,
    pub canvas: Canvas,
    pub normalize: NormalizeOpts,
    pub beat: BeatOpts,
    pub envelope: EnvelopeOpts,
    /// Music asset used when no generated track is available.
    pub fallback_music_asset: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            canvas: Canvas::default(),
            normalize: NormalizeOpts::default(),
            beat: BeatOpts::default(),
            envelope: EnvelopeOpts::default(),
            fallback_music_asset: "audio/fallback.mp3".to_owned(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SyncResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| SyncError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| SyncError::serde(format!("open config '{}': {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> SyncResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(SyncError::validation("canvas width/height must be > 0"));
        }
        self.normalize.validate()?;
        self.beat.validate()?;
        self.envelope.validate()?;
        if self.fallback_music_asset.trim().is_empty() {
            return Err(SyncError::validation("fallback_music_asset must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
