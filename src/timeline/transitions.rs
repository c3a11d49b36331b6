use crate::storyboard::scene::SceneKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge the incoming scene enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    FromLeft,
    FromRight,
    FromTop,
    FromBottom,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FromLeft => "from-left",
            Self::FromRight => "from-right",
            Self::FromTop => "from-top",
            Self::FromBottom => "from-bottom",
        }
    }
}

/// Visual presentation of an engine-inserted transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionStyle {
    /// Opacity crossfade.
    Fade,
    /// Hard-edged reveal sweeping in from `direction`.
    Wipe { direction: Direction },
    /// Incoming scene pushes in from `direction`.
    Slide { direction: Direction },
}

impl fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fade => f.write_str("fade"),
            Self::Wipe { direction } => write!(f, "wipe({})", direction.as_str()),
            Self::Slide { direction } => write!(f, "slide({})", direction.as_str()),
        }
    }
}

/// Pick the transition into `to`.
///
/// Keyed on the incoming kind only; `from` is accepted so the table can grow pair-specific
/// entries without changing callers. Every kind maps to a style, with fade as the fallback.
pub fn style_for(_from: SceneKind, to: SceneKind) -> TransitionStyle {
    match to {
        SceneKind::Problem => TransitionStyle::Wipe {
            direction: Direction::FromRight,
        },
        SceneKind::Solution => TransitionStyle::Slide {
            direction: Direction::FromBottom,
        },
        SceneKind::UseCases | SceneKind::Results => TransitionStyle::Slide {
            direction: Direction::FromRight,
        },
        SceneKind::Cta | SceneKind::Hook => TransitionStyle::Fade,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/transitions.rs"]
mod tests;
