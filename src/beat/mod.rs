pub mod mapper;
pub mod track;

pub use mapper::{quantize_beats, transition_frames};
pub use track::{BeatTrack, TempoData, resolve_bpm};
