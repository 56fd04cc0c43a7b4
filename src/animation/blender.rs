//! Weighted multi-clip composition.
//!
//! Entries are folded into one pose per node in the order supplied:
//! the first contributor of a node is taken as-is (its weight ignored), every
//! later one pulls the accumulated pose towards itself by its own weight.
//! With `[(previous, 1 - b), (current, b)]` this interpolates from previous
//! to current by `b`. Swapping the order changes the result; for three or
//! more entries this is not a weighted average.

use log::{debug, trace, warn};

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::pose::NodePose;
use crate::animation::tracks::KeyframeCursor;
use crate::animation::weighted::WeightedAnimation;
use crate::errors::AnimationError;
use crate::scene::NodeId;
use crate::settings::DEFAULT_TIME_TOLERANCE;

/// Entries with a weight at or below this are skipped.
pub const BLEND_WEIGHT_THRESHOLD: f32 = 0.05;

#[derive(Debug, Default)]
pub struct Blender {
    /// Accumulated pose per node, indexed by node id.
    poses: Vec<Option<NodePose>>,
    /// Single-clip evaluation buffer, same indexing.
    scratch: Vec<Option<NodePose>>,
    touched: Vec<NodeId>,
    /// Keyframe cursors per clip, per track. Kept across frames.
    cursors: Vec<Vec<KeyframeCursor>>,
    diagnostics: Vec<AnimationError>,
}

impl Blender {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of the last [`blend`](Self::blend), indexed by node id.
    /// `None` means no contributing channel touched the node.
    #[inline]
    #[must_use]
    pub fn poses(&self) -> &[Option<NodePose>] {
        &self.poses
    }

    #[inline]
    #[must_use]
    pub fn pose(&self, node: NodeId) -> Option<&NodePose> {
        self.poses.get(node).and_then(Option::as_ref)
    }

    /// Problems found during the last blend (unknown clips, clamped times).
    #[inline]
    #[must_use]
    pub fn diagnostics(&self) -> &[AnimationError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<AnimationError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Blends `weighted` with the default time tolerance.
    pub fn blend(
        &mut self,
        clips: &[AnimationClip],
        weighted: &[WeightedAnimation],
        frame_time: f32,
        node_count: usize,
    ) -> usize {
        self.blend_with_tolerance(clips, weighted, frame_time, node_count, DEFAULT_TIME_TOLERANCE)
    }

    /// Resets all poses, then folds every entry above the weight threshold
    /// into them. Returns the number of contributing entries.
    pub fn blend_with_tolerance(
        &mut self,
        clips: &[AnimationClip],
        weighted: &[WeightedAnimation],
        frame_time: f32,
        node_count: usize,
        tolerance: f32,
    ) -> usize {
        self.poses.clear();
        self.poses.resize(node_count, None);
        self.scratch.clear();
        self.scratch.resize(node_count, None);
        self.diagnostics.clear();
        if self.cursors.len() < clips.len() {
            self.cursors.resize_with(clips.len(), Vec::new);
        }

        let mut contributing = 0;
        for entry in weighted {
            if entry.weight <= BLEND_WEIGHT_THRESHOLD {
                trace!("clip {} skipped, weight {} below threshold", entry.clip, entry.weight);
                continue;
            }

            let Some(clip) = clips.get(entry.clip) else {
                warn!("weighted animation references unknown clip {}, ignored", entry.clip);
                self.diagnostics.push(AnimationError::UnknownClip(entry.clip));
                continue;
            };

            let time = match entry.target_time_with_tolerance(frame_time, tolerance) {
                Ok(time) => time,
                Err(err) => {
                    warn!("{err}");
                    let clamped = match &err {
                        AnimationError::TargetTimeOutOfRange { clamped, .. } => *clamped,
                        _ => entry.start_time,
                    };
                    self.diagnostics.push(err);
                    clamped
                }
            };

            let cursors = &mut self.cursors[entry.clip];
            if cursors.len() != clip.tracks().len() {
                *cursors = vec![KeyframeCursor::default(); clip.tracks().len()];
            }

            self.touched.clear();
            evaluate_clip_into(clip, time, cursors, &mut self.scratch, &mut self.touched);

            for &node in &self.touched {
                let Some(evaluated) = self.scratch[node].take() else {
                    continue;
                };
                let merged = match &self.poses[node] {
                    // First contributor: taken as-is
                    None => evaluated,
                    Some(previous) => previous.blend(&evaluated, entry.weight),
                };
                self.poses[node] = Some(merged);
            }
            contributing += 1;
        }

        trace!("blended {contributing} of {} weighted animations", weighted.len());
        contributing
    }
}

/// Samples every channel of `clip` at `time`, without cursors.
///
/// The returned vector is indexed by node id and has `node_count` entries.
#[must_use]
pub fn evaluate_clip(clip: &AnimationClip, time: f32, node_count: usize) -> Vec<Option<NodePose>> {
    let mut cursors = vec![KeyframeCursor::default(); clip.tracks().len()];
    let mut out = vec![None; node_count];
    let mut touched = Vec::new();
    evaluate_clip_into(clip, time, &mut cursors, &mut out, &mut touched);
    out
}

fn evaluate_clip_into(
    clip: &AnimationClip,
    time: f32,
    cursors: &mut [KeyframeCursor],
    out: &mut [Option<NodePose>],
    touched: &mut Vec<NodeId>,
) {
    for (track, cursor) in clip.tracks().iter().zip(cursors.iter_mut()) {
        let Some(slot) = out.get_mut(track.node) else {
            debug!("clip '{}' targets unknown node {}, channel skipped", clip.name, track.node);
            continue;
        };
        let pose = slot.get_or_insert_with(|| {
            touched.push(track.node);
            NodePose::default()
        });

        match (&track.data, track.target) {
            (TrackData::Vector3(t), TargetPath::Translation) => {
                pose.translation = Some(t.sample_with_cursor(time, cursor));
            }
            (TrackData::Vector3(t), TargetPath::Scale) => {
                pose.scale = Some(t.sample_with_cursor(time, cursor));
            }
            (TrackData::Quaternion(t), TargetPath::Rotation) => {
                pose.rotation = Some(t.sample_with_cursor(time, cursor));
            }
            (TrackData::MorphWeights(t), TargetPath::Weights) => {
                pose.weights = Some(t.sample_with_cursor(time, cursor));
            }
            // Rejected by ChannelTrack::new
            _ => {}
        }
    }
}
