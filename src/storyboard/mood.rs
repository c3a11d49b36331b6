use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Musical style requested from the music-generation service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioMood {
    /// Upbeat orchestral; the default for most products.
    #[default]
    CinematicClassical,
    /// High-energy synth anthem.
    CinematicElectronic,
    /// Catchy pop with a driving beat.
    CinematicPop,
    /// Trailer drums and brass.
    CinematicEpic,
    /// Dark but driving industrial beats.
    CinematicDark,
}

impl AudioMood {
    /// Every mood, default first.
    pub const ALL: [AudioMood; 5] = [
        AudioMood::CinematicClassical,
        AudioMood::CinematicElectronic,
        AudioMood::CinematicPop,
        AudioMood::CinematicEpic,
        AudioMood::CinematicDark,
    ];

    /// Wire tag used in storyboard JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CinematicClassical => "cinematic-classical",
            Self::CinematicElectronic => "cinematic-electronic",
            Self::CinematicPop => "cinematic-pop",
            Self::CinematicEpic => "cinematic-epic",
            Self::CinematicDark => "cinematic-dark",
        }
    }

    /// Tempo the planner is asked to target for this mood.
    pub fn planned_bpm(self) -> f64 {
        match self {
            Self::CinematicClassical | Self::CinematicElectronic => 128.0,
            Self::CinematicPop => 120.0,
            Self::CinematicEpic => 130.0,
            Self::CinematicDark => 124.0,
        }
    }

    /// Music-production brief used when the planner's prompt is missing or too short.
    pub fn default_prompt(self) -> &'static str {
        match self {
            Self::CinematicClassical => {
                "upbeat orchestral anthem, driving staccato strings, punchy timpani hits on every \
                 beat, fast tempo 130 BPM, triumphant brass fanfare, energetic pizzicato rhythm, \
                 building to an explosive climax, exciting and uplifting"
            }
            Self::CinematicElectronic => {
                "high-energy electronic anthem, punchy four-on-the-floor kick drum, driving synth \
                 bass, catchy melodic lead, euphoric build-ups with snare rolls, big layered drops, \
                 128 BPM, festival energy with cinematic production"
            }
            Self::CinematicPop => {
                "upbeat pop anthem, driving drum beat with punchy kick and snappy snare, catchy \
                 piano riff, hand claps and stomps, building to an explosive singalong chorus, \
                 120 BPM, feel-good energy"
            }
            Self::CinematicEpic => {
                "high-energy epic trailer music, pounding war drums at 130 BPM, staccato brass \
                 hits, urgent choir, relentless percussion building to massive orchestral drops"
            }
            Self::CinematicDark => {
                "dark but driving electronic, punchy industrial beats at 120 BPM, aggressive bass \
                 hits, sharp staccato synths, rapid percussion building tension, intense not ambient"
            }
        }
    }
}

/// Lyric sheet used when the planner's lyrics are missing or too short.
pub const DEFAULT_AUDIO_LYRICS: &str = "[Verse 1]
Breaking through the noise, something new is here
Built to make it simple, built to make it clear

[Chorus]
This is how it starts, this is how we grow
One step at a time, watch the future flow

[Bridge]
No more waiting, the time is now

[Outro]
Take the leap, start today";

impl FromStr for AudioMood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == tag)
            .ok_or_else(|| format!("unknown audio mood '{}'", s.trim()))
    }
}

impl fmt::Display for AudioMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storyboard/mood.rs"]
mod tests;
