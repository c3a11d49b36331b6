use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{SyncError, SyncResult};
use crate::storyboard::model::Storyboard;
use crate::storyboard::scene::SceneKind;
use crate::timeline::fingerprint::{TimelineFingerprint, fingerprint_timeline};
use crate::timeline::transitions::{TransitionStyle, style_for};
use serde::{Deserialize, Serialize};

/// One span on the timeline frame axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Segment {
    /// A storyboard scene, addressed by its index in the normalized scene list.
    Content {
        scene_index: usize,
        kind: SceneKind,
        range: FrameRange,
    },
    /// Overlap between two adjacent scenes. Its range is shared with the tail of the outgoing
    /// scene and the head of the incoming one.
    Transition {
        style: TransitionStyle,
        from_kind: SceneKind,
        to_kind: SceneKind,
        range: FrameRange,
    },
}

impl Segment {
    pub fn range(&self) -> FrameRange {
        match self {
            Self::Content { range, .. } | Self::Transition { range, .. } => *range,
        }
    }

    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transition { .. })
    }
}

/// Frame-axis layout of a normalized storyboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Length of every transition segment.
    pub transition_frames: u64,
    /// Content and transition segments in start order; each transition sits between the two
    /// content segments it joins.
    pub segments: Vec<Segment>,
    pub total_frames: u64,
}

impl Timeline {
    /// Segments whose range covers `frame`. During a transition this yields both scenes and the
    /// transition itself.
    pub fn segments_at(&self, frame: u64) -> impl Iterator<Item = &Segment> + '_ {
        self.segments
            .iter()
            .filter(move |s| s.range().contains(FrameIndex(frame)))
    }

    /// Frame span of the scene at `scene_index`.
    pub fn content_range(&self, scene_index: usize) -> Option<FrameRange> {
        self.segments.iter().find_map(|s| match s {
            Segment::Content {
                scene_index: i,
                range,
                ..
            } if *i == scene_index => Some(*range),
            _ => None,
        })
    }

    pub fn content_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_transition()).count()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter().filter(|s| s.is_transition())
    }

    pub fn duration_secs(&self, fps: Fps) -> f64 {
        fps.frames_to_secs(self.total_frames)
    }

    /// Stable digest of the layout; equal timelines always produce equal fingerprints.
    pub fn fingerprint(&self) -> TimelineFingerprint {
        fingerprint_timeline(self)
    }
}

/// Lay out `storyboard` on the frame axis with `transition_frames`-long overlaps between scenes.
///
/// Each scene after the first starts `transition_frames` before the previous one ends, so
/// `total_frames = Σ durations − (n − 1) · transition_frames`, clamped at zero.
///
/// A negative transition length or an empty scene list is a contract violation and fails with
/// [`SyncError::Composition`]. A transition longer than a scene it touches is only logged; start
/// offsets saturate at frame 0.
#[tracing::instrument(skip(storyboard), fields(scenes = storyboard.scenes.len()))]
pub fn compose(storyboard: &Storyboard, transition_frames: i64) -> SyncResult<Timeline> {
    let tf = u64::try_from(transition_frames).map_err(|_| {
        SyncError::composition(format!(
            "transition length must be >= 0, got {transition_frames}"
        ))
    })?;
    let scenes = &storyboard.scenes;
    if scenes.is_empty() {
        return Err(SyncError::composition("storyboard has no content scenes"));
    }

    let mut segments = Vec::with_capacity(scenes.len() * 2 - 1);
    let mut start = 0u64;
    for (i, scene) in scenes.iter().enumerate() {
        let len = scene.duration_in_frames;
        if i > 0 {
            let prev = &scenes[i - 1];
            if tf > prev.duration_in_frames || tf > len {
                tracing::warn!(
                    scene = i,
                    transition_frames = tf,
                    outgoing = prev.duration_in_frames,
                    incoming = len,
                    "transition is longer than an adjacent scene"
                );
            }
            segments.push(Segment::Transition {
                style: style_for(prev.kind(), scene.kind()),
                from_kind: prev.kind(),
                to_kind: scene.kind(),
                range: FrameRange::at(start, tf),
            });
        }
        segments.push(Segment::Content {
            scene_index: i,
            kind: scene.kind(),
            range: FrameRange::at(start, len),
        });
        start = start.saturating_add(len).saturating_sub(tf);
    }

    let content = storyboard.content_frames();
    let overlap = tf.saturating_mul(scenes.len() as u64 - 1);
    let total_frames = content.saturating_sub(overlap);

    tracing::debug!(
        segments = segments.len(),
        transition_frames = tf,
        content_frames = content,
        total_frames,
        "composed timeline"
    );

    Ok(Timeline {
        transition_frames: tf,
        segments,
        total_frames,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/compose.rs"]
mod tests;
