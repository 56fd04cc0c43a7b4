use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::values::{Interpolatable, MorphWeightData};
use crate::scene::transform::Transform;

/// How a touched node's components that no channel drove are filled in
/// before the pose becomes a matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentFallback {
    /// Zero translation, identity rotation, unit scale.
    #[default]
    Identity,
    /// The node's rest pose (`initial_local`).
    RestPose,
}

/// A node's pose while clips are being accumulated.
///
/// Each component is `None` until some channel contributes it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodePose {
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
    pub weights: Option<MorphWeightData>,
}

impl NodePose {
    /// True if any of translation / rotation / scale was contributed.
    #[inline]
    #[must_use]
    pub fn has_transform(&self) -> bool {
        self.translation.is_some() || self.rotation.is_some() || self.scale.is_some()
    }

    /// Moves `self` towards `other` by `weight`.
    ///
    /// Components present on both sides are lerped (slerped for rotation).
    /// A component only one side has is taken as-is, since the other side
    /// never contributed it. Not commutative: `a.blend(b, w)` favours `b`
    /// as `w` grows.
    #[must_use]
    pub fn blend(&self, other: &NodePose, weight: f32) -> NodePose {
        NodePose {
            translation: mix(self.translation, other.translation, weight),
            rotation: mix(self.rotation, other.rotation, weight),
            scale: mix(self.scale, other.scale, weight),
            weights: mix(self.weights, other.weights, weight),
        }
    }

    /// Resolves every missing component into a complete transform.
    #[must_use]
    pub fn resolve(&self, fallback: ComponentFallback, rest: &Transform) -> Transform {
        let base = match fallback {
            ComponentFallback::Identity => Transform::IDENTITY,
            ComponentFallback::RestPose => *rest,
        };
        Transform {
            translation: self.translation.unwrap_or(base.translation),
            rotation: self.rotation.unwrap_or(base.rotation),
            scale: self.scale.unwrap_or(base.scale),
        }
    }
}

fn mix<T: Interpolatable>(current: Option<T>, incoming: Option<T>, weight: f32) -> Option<T> {
    match (current, incoming) {
        (Some(a), Some(b)) => Some(T::interpolate_linear(a, b, weight)),
        (a, b) => a.or(b),
    }
}
