use glam::Mat4;

use crate::animation::values::MorphWeightData;
use crate::scene::NodeId;
use crate::scene::transform::Transform;

/// A scene node in the flat node arena.
///
/// # Hierarchy
///
/// Nodes form a forest through parent-child indices:
/// - `parent`: index of the parent node (None for root nodes)
/// - `children`: ordered child indices
///
/// The forest shape is guaranteed by the asset source and is not verified;
/// a cycle makes propagation run forever.
///
/// # Transform
///
/// - `initial_local`: rest pose from the asset source, never modified by playback
/// - `computed_local`: this frame's animated local transform (None until written)
/// - `computed_world`: this frame's world transform (None until propagated)
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    // === Spatial Data ===
    pub initial_local: Transform,
    pub(crate) computed_local: Option<Transform>,
    pub(crate) computed_world: Option<Transform>,

    /// Morph weights driven by the last evaluated frame, if any channel targets them.
    pub(crate) morph_weights: Option<MorphWeightData>,
}

impl SceneNode {
    #[must_use]
    pub fn new(name: impl Into<String>, initial_local: Transform) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            initial_local,
            computed_local: None,
            computed_world: None,
            morph_weights: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn computed_local(&self) -> Option<&Transform> {
        self.computed_local.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn computed_world(&self) -> Option<&Transform> {
        self.computed_world.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn morph_weights(&self) -> Option<&MorphWeightData> {
        self.morph_weights.as_ref()
    }

    /// Local transform used for propagation: the animated one if this frame
    /// wrote it, otherwise the rest pose.
    #[inline]
    #[must_use]
    pub fn effective_local(&self) -> Transform {
        self.computed_local.unwrap_or(self.initial_local)
    }

    /// World matrix of the last propagation, if this node was reached.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> Option<Mat4> {
        self.computed_world.map(|w| w.to_matrix())
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new(String::new(), Transform::IDENTITY)
    }
}
