use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;
use crate::animation::values::MorphWeightData;
use crate::errors::{AnimationError, Result};
use crate::scene::NodeId;

/// Index of a clip registered with an [`Animator`](crate::Animator).
pub type ClipId = usize;

/// Duration given to clips whose tracks carry no timing data.
pub const DEFAULT_CLIP_DURATION: f32 = 1.0;

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
    MorphWeights(KeyframeTrack<MorphWeightData>),
}

impl TrackData {
    #[must_use]
    pub fn last_time(&self) -> Option<f32> {
        match self {
            TrackData::Vector3(track) => track.last_time(),
            TrackData::Quaternion(track) => track.last_time(),
            TrackData::MorphWeights(track) => track.last_time(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            TrackData::Vector3(_) => "vec3",
            TrackData::Quaternion(_) => "quaternion",
            TrackData::MorphWeights(_) => "morph weight",
        }
    }

    fn accepts(&self, target: TargetPath) -> bool {
        matches!(
            (self, target),
            (TrackData::Vector3(_), TargetPath::Translation | TargetPath::Scale)
                | (TrackData::Quaternion(_), TargetPath::Rotation)
                | (TrackData::MorphWeights(_), TargetPath::Weights)
        )
    }
}

/// One property of one node over time.
#[derive(Debug, Clone)]
pub struct ChannelTrack {
    pub node: NodeId,
    pub target: TargetPath,
    pub data: TrackData,
}

impl ChannelTrack {
    pub fn new(node: NodeId, target: TargetPath, data: TrackData) -> Result<Self> {
        if !data.accepts(target) {
            return Err(AnimationError::TargetMismatch {
                target,
                data: data.kind(),
            });
        }
        Ok(Self { node, target, data })
    }

    pub fn translation(node: NodeId, track: KeyframeTrack<Vec3>) -> Self {
        Self {
            node,
            target: TargetPath::Translation,
            data: TrackData::Vector3(track),
        }
    }

    pub fn rotation(node: NodeId, track: KeyframeTrack<Quat>) -> Self {
        Self {
            node,
            target: TargetPath::Rotation,
            data: TrackData::Quaternion(track),
        }
    }

    pub fn scale(node: NodeId, track: KeyframeTrack<Vec3>) -> Self {
        Self {
            node,
            target: TargetPath::Scale,
            data: TrackData::Vector3(track),
        }
    }

    pub fn weights(node: NodeId, track: KeyframeTrack<MorphWeightData>) -> Self {
        Self {
            node,
            target: TargetPath::Weights,
            data: TrackData::MorphWeights(track),
        }
    }
}

/// A named animation. Immutable once built.
///
/// Tracks are stored grouped by node (stable with respect to the input
/// order) so that evaluating one node touches adjacent memory.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    tracks: Vec<ChannelTrack>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, mut tracks: Vec<ChannelTrack>) -> Self {
        let duration = tracks
            .iter()
            .filter_map(|t| t.data.last_time())
            .fold(0.0_f32, f32::max);
        let duration = if duration > 0.0 {
            duration
        } else {
            DEFAULT_CLIP_DURATION
        };

        tracks.sort_by_key(|t| t.node);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    #[inline]
    #[must_use]
    pub fn tracks(&self) -> &[ChannelTrack] {
        &self.tracks
    }

    /// Iterates tracks one node at a time.
    pub fn node_groups(&self) -> impl Iterator<Item = &[ChannelTrack]> {
        self.tracks.chunk_by(|a, b| a.node == b.node)
    }
}
