use crate::foundation::error::{SyncError, SyncResult};
use crate::storyboard::model::{ColorThemeDef, Storyboard, StoryboardDef};
use crate::storyboard::mood::{AudioMood, DEFAULT_AUDIO_LYRICS};
use crate::storyboard::scene::{Scene, SceneContent, SceneKind};
use crate::storyboard::theme::{ColorTheme, HexColor, ThemeSlot};
use serde::{Deserialize, Serialize};
use std::fmt;

const LEGACY_TRANSITION_TAG: &str = "transition";

/// Tunables for [`normalize`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOpts {
    /// Lowest accepted planned tempo (inclusive).
    pub bpm_min: f64,
    /// Highest accepted planned tempo (inclusive).
    pub bpm_max: f64,
    /// Tempo substituted when the planned one is absent or out of band.
    pub default_bpm: f64,
    /// Content-frame budget; storyboards above it are scaled down.
    pub max_content_frames: u64,
    /// Sum the scaling pass aims for once the budget is exceeded.
    pub scale_target_frames: u64,
    /// Floor applied to every scaled scene.
    pub min_scene_frames: u64,
    /// Creative text shorter than this (in chars) counts as missing.
    pub min_creative_len: usize,
    /// Kind the narrative is expected to open with.
    pub opening_kind: SceneKind,
    /// Kind the narrative is expected to close with.
    pub closing_kind: SceneKind,
}

impl Default for NormalizeOpts {
    fn default() -> Self {
        Self {
            bpm_min: 80.0,
            bpm_max: 200.0,
            default_bpm: 128.0,
            max_content_frames: 480,
            scale_target_frames: 480,
            min_scene_frames: 30,
            min_creative_len: 10,
            opening_kind: SceneKind::Hook,
            closing_kind: SceneKind::Cta,
        }
    }
}

impl NormalizeOpts {
    /// Reject option sets that cannot produce a sane storyboard.
    pub fn validate(&self) -> SyncResult<()> {
        if !(self.bpm_min.is_finite() && self.bpm_max.is_finite()) || self.bpm_min > self.bpm_max
        {
            return Err(SyncError::validation(
                "normalize.bpm_min must be <= normalize.bpm_max",
            ));
        }
        if !(self.bpm_min..=self.bpm_max).contains(&self.default_bpm) {
            return Err(SyncError::validation(
                "normalize.default_bpm must lie inside [bpm_min, bpm_max]",
            ));
        }
        if self.max_content_frames == 0 || self.scale_target_frames == 0 {
            return Err(SyncError::validation(
                "normalize content budgets must be > 0 frames",
            ));
        }
        if self.min_scene_frames == 0 {
            return Err(SyncError::validation(
                "normalize.min_scene_frames must be > 0",
            ));
        }
        Ok(())
    }
}

/// Non-fatal condition repaired during normalization.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum NormalizeWarning {
    /// Author-specified transition markers were removed.
    LegacyTransitionsDropped { count: usize },
    /// A scene with a tag outside the content set was removed.
    UnknownSceneDropped { index: usize, tag: String },
    /// The first scene is not the opening kind.
    UnexpectedOpening {
        found: SceneKind,
        expected: SceneKind,
    },
    /// The last scene is not the closing kind.
    UnexpectedClosing {
        found: SceneKind,
        expected: SceneKind,
    },
    /// Planned tempo was absent or out of band.
    BpmReplaced {
        found: Option<f64>,
        replacement: f64,
    },
    /// Content frames exceeded the budget and were scaled.
    DurationScaled { from_frames: u64, to_frames: u64 },
    /// Planned mood is not a known mood.
    UnknownMood {
        found: String,
        replacement: AudioMood,
    },
    /// A secondary theme color was missing or malformed.
    ThemeColorReplaced {
        slot: ThemeSlot,
        found: Option<String>,
        replacement: HexColor,
    },
    /// Music prompt was missing or too short.
    AudioPromptDefaulted,
    /// Lyrics were missing or too short.
    AudioLyricsDefaulted,
    /// Narration script was missing or too short; narration is disabled.
    NarrationDisabled,
}

impl fmt::Display for NormalizeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyTransitionsDropped { count } => {
                write!(f, "dropped {count} legacy transition scene(s)")
            }
            Self::UnknownSceneDropped { index, tag } => {
                write!(f, "dropped scene {index} with unknown type '{tag}'")
            }
            Self::UnexpectedOpening { found, expected } => write!(
                f,
                "first scene is '{found}', not '{expected}'; narrative may be off"
            ),
            Self::UnexpectedClosing { found, expected } => write!(
                f,
                "last scene is '{found}', not '{expected}'; narrative may be off"
            ),
            Self::BpmReplaced { found, replacement } => match found {
                Some(bpm) => write!(f, "bpm {bpm} out of band, using {replacement}"),
                None => write!(f, "bpm missing, using {replacement}"),
            },
            Self::DurationScaled {
                from_frames,
                to_frames,
            } => write!(
                f,
                "content frames {from_frames} exceed budget, scaled to {to_frames}"
            ),
            Self::UnknownMood { found, replacement } => {
                write!(f, "unknown audio mood '{found}', using '{replacement}'")
            }
            Self::ThemeColorReplaced {
                slot,
                found,
                replacement,
            } => match found {
                Some(v) => write!(f, "colorTheme.{slot} '{v}' is malformed, using {replacement}"),
                None => write!(f, "colorTheme.{slot} missing, using {replacement}"),
            },
            Self::AudioPromptDefaulted => write!(f, "audio prompt missing, using mood default"),
            Self::AudioLyricsDefaulted => write!(f, "audio lyrics missing, using default lyrics"),
            Self::NarrationDisabled => write!(f, "narration script missing, narration disabled"),
        }
    }
}

/// Normalized storyboard plus every repair that was applied to it.
#[derive(Clone, Debug)]
pub struct Normalized {
    pub storyboard: Storyboard,
    pub warnings: Vec<NormalizeWarning>,
}

/// Validate and repair a planner-produced storyboard.
///
/// Fails only when the input is structurally unusable (missing scenes, primary color or mood,
/// untagged or malformed content scenes). Everything else is repaired in place and reported in
/// [`Normalized::warnings`].
#[tracing::instrument(skip(raw, opts), fields(scenes = raw.scenes.as_ref().map(Vec::len)))]
pub fn normalize(
    raw: StoryboardDef,
    mood_override: Option<AudioMood>,
    opts: &NormalizeOpts,
) -> SyncResult<Normalized> {
    opts.validate()?;

    let StoryboardDef {
        scenes,
        color_theme,
        audio_mood,
        bpm,
        product_url,
        audio_track_file,
        narration_track_file,
        audio_prompt,
        audio_lyrics,
        narration_script,
    } = raw;

    // Required presence.
    let raw_scenes = match scenes {
        Some(s) if !s.is_empty() => s,
        _ => return Err(SyncError::validation("scenes array is missing or empty")),
    };
    let theme_def = color_theme
        .filter(|t| t.primary.as_deref().is_some_and(|p| !p.trim().is_empty()))
        .ok_or_else(|| SyncError::validation("colorTheme is missing or has no primary color"))?;
    let planned_mood = audio_mood
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| SyncError::validation("audioMood is missing"))?;

    let mut warnings = Vec::new();

    let mut scenes = parse_scenes(raw_scenes, &mut warnings)?;
    if scenes.is_empty() {
        return Err(SyncError::validation(
            "storyboard has no content scenes after dropping transitions",
        ));
    }

    let color_theme = complete_theme(theme_def, &mut warnings)?;

    check_narrative_shape(&scenes, opts, &mut warnings);

    let bpm = sanitize_bpm(bpm, opts, &mut warnings);

    enforce_budget(&mut scenes, opts, &mut warnings);

    let mood = match (mood_override, planned_mood.parse::<AudioMood>()) {
        (Some(over), _) => {
            tracing::debug!(planned = %planned_mood, over = %over, "applying audio mood override");
            over
        }
        (None, Ok(m)) => m,
        (None, Err(_)) => {
            let replacement = AudioMood::default();
            warnings.push(NormalizeWarning::UnknownMood {
                found: planned_mood.clone(),
                replacement,
            });
            replacement
        }
    };

    let audio_prompt = match plausible(audio_prompt, opts.min_creative_len) {
        Some(p) => p,
        None => {
            warnings.push(NormalizeWarning::AudioPromptDefaulted);
            mood.default_prompt().to_owned()
        }
    };
    let audio_lyrics = match plausible(audio_lyrics, opts.min_creative_len) {
        Some(l) => l,
        None => {
            warnings.push(NormalizeWarning::AudioLyricsDefaulted);
            DEFAULT_AUDIO_LYRICS.to_owned()
        }
    };
    let narration_script = match plausible(narration_script, opts.min_creative_len) {
        Some(s) => s,
        None => {
            warnings.push(NormalizeWarning::NarrationDisabled);
            String::new()
        }
    };

    for w in &warnings {
        tracing::warn!("{w}");
    }

    let storyboard = Storyboard {
        scenes,
        color_theme,
        audio_mood: mood,
        bpm,
        product_url: product_url.unwrap_or_default(),
        audio_track_file: non_empty(audio_track_file),
        narration_track_file: non_empty(narration_track_file),
        audio_prompt,
        audio_lyrics,
        narration_script,
    };
    tracing::info!(
        bpm = storyboard.bpm,
        mood = %storyboard.audio_mood,
        frames = storyboard.content_frames(),
        "storyboard: {} scenes, {}",
        storyboard.scenes.len(),
        storyboard.narrative(),
    );

    Ok(Normalized {
        storyboard,
        warnings,
    })
}

fn parse_scenes(
    raw: Vec<serde_json::Value>,
    warnings: &mut Vec<NormalizeWarning>,
) -> SyncResult<Vec<Scene>> {
    let mut out = Vec::with_capacity(raw.len());
    let mut legacy = 0usize;

    for (i, v) in raw.into_iter().enumerate() {
        let serde_json::Value::Object(mut obj) = v else {
            return Err(SyncError::validation(format!(
                "scene {i} must be a JSON object"
            )));
        };
        let tag = obj
            .get("type")
            .and_then(|t| t.as_str())
            .map(|t| t.trim().to_ascii_lowercase())
            .ok_or_else(|| SyncError::validation(format!("scene {i} has no \"type\" tag")))?;

        if tag == LEGACY_TRANSITION_TAG {
            legacy += 1;
            continue;
        }
        if SceneKind::from_tag(&tag).is_none() {
            warnings.push(NormalizeWarning::UnknownSceneDropped { index: i, tag });
            continue;
        }
        obj.insert("type".to_owned(), serde_json::Value::String(tag.clone()));

        let duration_in_frames = match obj.remove("durationInFrames") {
            Some(d) => scene_frames(&d).ok_or_else(|| {
                SyncError::validation(format!(
                    "scene {i} ({tag}): durationInFrames must be a number >= 1, got {d}"
                ))
            })?,
            None => {
                return Err(SyncError::validation(format!(
                    "scene {i} ({tag}): durationInFrames is missing"
                )));
            }
        };

        let content: SceneContent = serde_json::from_value(serde_json::Value::Object(obj))
            .map_err(|e| SyncError::validation(format!("scene {i} ({tag}): {e}")))?;

        out.push(Scene {
            duration_in_frames,
            content,
        });
    }

    if legacy > 0 {
        tracing::debug!(count = legacy, "dropping legacy transition scenes");
        warnings.push(NormalizeWarning::LegacyTransitionsDropped { count: legacy });
    }
    Ok(out)
}

/// Round a JSON number to whole frames; `None` unless the result is at least one frame.
fn scene_frames(v: &serde_json::Value) -> Option<u64> {
    let f = v.as_f64()?;
    if !f.is_finite() {
        return None;
    }
    let r = f.round();
    (r >= 1.0).then_some(r as u64)
}

fn complete_theme(
    def: ColorThemeDef,
    warnings: &mut Vec<NormalizeWarning>,
) -> SyncResult<ColorTheme> {
    let primary_raw = def.primary.unwrap_or_default();
    let primary = HexColor::parse(&primary_raw)
        .map_err(|e| SyncError::validation(format!("colorTheme.primary: {e}")))?;

    let mut resolve = |slot: ThemeSlot, raw: Option<String>| -> HexColor {
        if let Some(c) = raw.as_deref().and_then(|s| HexColor::parse(s).ok()) {
            return c;
        }
        let replacement = slot.fallback(&primary);
        warnings.push(NormalizeWarning::ThemeColorReplaced {
            slot,
            found: raw.filter(|s| !s.trim().is_empty()),
            replacement: replacement.clone(),
        });
        replacement
    };

    let [secondary, accent, background, text, text_secondary] = ThemeSlot::SECONDARY_SLOTS;
    Ok(ColorTheme {
        secondary: resolve(secondary, def.secondary),
        accent: resolve(accent, def.accent),
        background: resolve(background, def.background),
        text: resolve(text, def.text),
        text_secondary: resolve(text_secondary, def.text_secondary),
        primary,
    })
}

fn check_narrative_shape(
    scenes: &[Scene],
    opts: &NormalizeOpts,
    warnings: &mut Vec<NormalizeWarning>,
) {
    if let Some(first) = scenes.first().map(Scene::kind)
        && first != opts.opening_kind
    {
        warnings.push(NormalizeWarning::UnexpectedOpening {
            found: first,
            expected: opts.opening_kind,
        });
    }
    if let Some(last) = scenes.last().map(Scene::kind)
        && last != opts.closing_kind
    {
        warnings.push(NormalizeWarning::UnexpectedClosing {
            found: last,
            expected: opts.closing_kind,
        });
    }
}

fn sanitize_bpm(
    bpm: Option<f64>,
    opts: &NormalizeOpts,
    warnings: &mut Vec<NormalizeWarning>,
) -> f64 {
    match bpm {
        Some(b) if b.is_finite() && (opts.bpm_min..=opts.bpm_max).contains(&b) => b,
        found => {
            warnings.push(NormalizeWarning::BpmReplaced {
                found,
                replacement: opts.default_bpm,
            });
            opts.default_bpm
        }
    }
}

/// Single proportional pass: each scene rounds independently and is floored at
/// `min_scene_frames`. Either step can leave the sum a few frames above the target, and with the
/// default target of 480 that can exceed `max_content_frames` too (7 x 100 scales to 483).
fn enforce_budget(
    scenes: &mut [Scene],
    opts: &NormalizeOpts,
    warnings: &mut Vec<NormalizeWarning>,
) {
    let total = sum_frames(scenes);
    if total <= opts.max_content_frames {
        return;
    }

    let scale = opts.scale_target_frames as f64 / total as f64;
    for scene in scenes.iter_mut() {
        let scaled = (scene.duration_in_frames as f64 * scale).round() as u64;
        scene.duration_in_frames = scaled.max(opts.min_scene_frames);
    }

    let to_frames = sum_frames(scenes);
    warnings.push(NormalizeWarning::DurationScaled {
        from_frames: total,
        to_frames,
    });
}

fn sum_frames(scenes: &[Scene]) -> u64 {
    scenes
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.duration_in_frames))
}

fn plausible(s: Option<String>, min_len: usize) -> Option<String> {
    s.filter(|s| s.trim().chars().count() >= min_len)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/pass.rs"]
mod tests;
