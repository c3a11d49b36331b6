use crate::audio::envelope::VolumeEnvelope;
use crate::foundation::core::Fps;
use crate::foundation::error::{SyncError, SyncResult};

/// Scale interleaved PCM in place by `envelope`.
///
/// Sample positions map onto timeline frames through the rational `fps`, so breakpoints land on
/// the same sample regardless of frame-rate rounding. Samples past the last breakpoint take its
/// volume.
pub fn apply_envelope(
    samples_interleaved: &mut [f32],
    channels: u16,
    sample_rate: u32,
    fps: Fps,
    envelope: &VolumeEnvelope,
) -> SyncResult<()> {
    if channels == 0 {
        return Err(SyncError::validation("channel count must be > 0"));
    }
    if fps.num == 0 || fps.den == 0 {
        return Err(SyncError::validation("fps must have a non-zero num and den"));
    }
    if sample_rate == 0 {
        return Err(SyncError::validation("sample rate must be > 0"));
    }
    let ch = usize::from(channels);
    if samples_interleaved.len() % ch != 0 {
        return Err(SyncError::validation(format!(
            "interleaved buffer of {} samples is not a multiple of {ch} channels",
            samples_interleaved.len()
        )));
    }
    let total = samples_interleaved.len() / ch;
    let to_sample = |frame: u64| {
        usize::try_from(frame_to_sample(frame, fps, sample_rate)).map_or(total, |s| s.min(total))
    };

    let points = envelope.points();
    let Some(first) = points.first() else {
        return Ok(());
    };

    let mut cursor = to_sample(first.frame);
    scale(&mut samples_interleaved[..cursor * ch], first.volume);

    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let end = to_sample(b.frame);
        let span = end.saturating_sub(cursor);
        for (i, frame) in samples_interleaved[cursor * ch..end * ch]
            .chunks_exact_mut(ch)
            .enumerate()
        {
            let t = i as f32 / span as f32;
            let gain = a.volume + (b.volume - a.volume) * t;
            for s in frame {
                *s *= gain;
            }
        }
        cursor = end;
    }

    let tail = points.last().map_or(first.volume, |p| p.volume);
    scale(&mut samples_interleaved[cursor * ch..], tail);
    Ok(())
}

fn scale(samples: &mut [f32], gain: f32) {
    for s in samples {
        *s *= gain;
    }
}

/// Convert a frame delta to the nearest sample index at `sample_rate`.
pub fn frame_to_sample(frame_delta: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frame_delta) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num);
    ((num + (den / 2)) / den) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/gain.rs"]
mod tests;
