use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex color in canonical `#RRGGBB` or `#RRGGBBAA` form (uppercase).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse `#RRGGBB` / `#RRGGBBAA` (leading `#` optional, case-insensitive).
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let digits = s.strip_prefix('#').unwrap_or(s);
        if !matches!(digits.len(), 6 | 8) {
            return Err(format!(
                "hex color \"{s}\" must be #RRGGBB or #RRGGBBAA (case-insensitive)"
            ));
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(format!("hex color \"{s}\" contains non-hex digit '{bad}'"));
        }
        Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Straight-alpha RGBA8 components.
    pub fn rgba8(&self) -> [u8; 4] {
        let d = &self.0[1..];
        let byte = |i: usize| u8::from_str_radix(&d[i..i + 2], 16).unwrap_or(0);
        let a = if d.len() == 8 { byte(6) } else { 255 };
        [byte(0), byte(2), byte(4), a]
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Six-color palette the renderer paints scenes with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorTheme {
    /// Main brand color (buttons, accents).
    pub primary: HexColor,
    /// Card/surface background.
    pub secondary: HexColor,
    /// Highlight color complementing `primary`.
    pub accent: HexColor,
    /// Page background.
    pub background: HexColor,
    /// Main text color.
    pub text: HexColor,
    /// Muted text color.
    pub text_secondary: HexColor,
}

/// Named slot of a [`ColorTheme`], used when reporting repairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeSlot {
    Secondary,
    Accent,
    Background,
    Text,
    TextSecondary,
}

impl ThemeSlot {
    pub(crate) const SECONDARY_SLOTS: [ThemeSlot; 5] = [
        ThemeSlot::Secondary,
        ThemeSlot::Accent,
        ThemeSlot::Background,
        ThemeSlot::Text,
        ThemeSlot::TextSecondary,
    ];

    /// Wire name of the slot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::Background => "background",
            Self::Text => "text",
            Self::TextSecondary => "textSecondary",
        }
    }

    /// Dark-mode fallback; `accent` falls back to the primary color.
    pub(crate) fn fallback(self, primary: &HexColor) -> HexColor {
        let hex = match self {
            Self::Secondary => "#1A1A1A",
            Self::Accent => return primary.clone(),
            Self::Background => "#0A0A0A",
            Self::Text => "#FAFAFA",
            Self::TextSecondary => "#A1A1AA",
        };
        HexColor(hex.to_owned())
    }
}

impl fmt::Display for ThemeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storyboard/theme.rs"]
mod tests;
