use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Open passthrough attributes the planner attached to a scene beyond its required fields.
///
/// Kept verbatim for the renderer; validation never looks inside.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Closed set of narrative content kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    /// Brand slam that opens the video.
    Hook,
    /// Pain point the product answers.
    Problem,
    /// The product as the answer.
    Solution,
    /// Real-world examples or customer types.
    UseCases,
    /// Metrics proving the product works.
    Results,
    /// Closing call to action.
    Cta,
}

impl SceneKind {
    /// Every content kind in narrative order.
    pub const ALL: [SceneKind; 6] = [
        SceneKind::Hook,
        SceneKind::Problem,
        SceneKind::Solution,
        SceneKind::UseCases,
        SceneKind::Results,
        SceneKind::Cta,
    ];

    /// Wire tag used in storyboard JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hook => "hook",
            Self::Problem => "problem",
            Self::Solution => "solution",
            Self::UseCases => "use-cases",
            Self::Results => "results",
            Self::Cta => "cta",
        }
    }

    /// Resolve a wire tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized narrative unit: a frame duration plus kind-specific content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Length of the scene in frames, always `>= 1`.
    pub duration_in_frames: u64,
    /// Kind tag and payload.
    #[serde(flatten)]
    pub content: SceneContent,
}

impl Scene {
    /// Content kind of this scene.
    pub fn kind(&self) -> SceneKind {
        self.content.kind()
    }
}

/// Kind-tagged scene payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SceneContent {
    /// `hook` payload.
    Hook(HookScene),
    /// `problem` payload.
    Problem(ProblemScene),
    /// `solution` payload.
    Solution(SolutionScene),
    /// `use-cases` payload.
    UseCases(UseCasesScene),
    /// `results` payload.
    Results(ResultsScene),
    /// `cta` payload.
    Cta(CtaScene),
}

impl SceneContent {
    /// Content kind of this payload.
    pub fn kind(&self) -> SceneKind {
        match self {
            Self::Hook(_) => SceneKind::Hook,
            Self::Problem(_) => SceneKind::Problem,
            Self::Solution(_) => SceneKind::Solution,
            Self::UseCases(_) => SceneKind::UseCases,
            Self::Results(_) => SceneKind::Results,
            Self::Cta(_) => SceneKind::Cta,
        }
    }

    /// Passthrough attributes attached to this payload.
    pub fn extra(&self) -> &Attributes {
        match self {
            Self::Hook(s) => &s.extra,
            Self::Problem(s) => &s.extra,
            Self::Solution(s) => &s.extra,
            Self::UseCases(s) => &s.extra,
            Self::Results(s) => &s.extra,
            Self::Cta(s) => &s.extra,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookScene {
    pub brand_name: String,
    pub tagline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,
    #[serde(flatten)]
    pub extra: Attributes,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemScene {
    pub headline: String,
    pub pain_points: Vec<String>,
    #[serde(flatten)]
    pub extra: Attributes,
}

/// Titled item shown in `solution` and `use-cases` scenes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionScene {
    pub headline: String,
    pub features: Vec<Highlight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
    #[serde(flatten)]
    pub extra: Attributes,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCasesScene {
    pub headline: String,
    pub cases: Vec<Highlight>,
    #[serde(flatten)]
    pub extra: Attributes,
}

/// Numeric stat counted up in a `results` scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub value: f64,
    #[serde(default)]
    pub suffix: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsScene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    pub stats: Vec<Stat>,
    #[serde(flatten)]
    pub extra: Attributes,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaScene {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    pub button_text: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Attributes,
}

#[cfg(test)]
#[path = "../../tests/unit/storyboard/scene.rs"]
mod tests;
