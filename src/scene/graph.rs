use glam::Mat4;
use log::debug;

use crate::animation::pose::{ComponentFallback, NodePose};
use crate::errors::{AnimationError, Result};
use crate::scene::NodeId;
use crate::scene::node::SceneNode;
use crate::scene::transform_system;

/// Node hierarchy stored as a flat arena.
///
/// Parent and child links are indices into `nodes`; there are no references
/// between nodes, so bounds checks replace pointer validity checks.
/// Topology is fixed once the animator owns the graph; per frame only the
/// `computed_*` fields of the nodes change.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    root_nodes: Vec<NodeId>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_nodes: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn root_nodes(&self) -> &[NodeId] {
        &self.root_nodes
    }

    /// Adds a node to the graph as a root.
    pub fn add_node(&mut self, node: SceneNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        self.root_nodes.push(id);
        id
    }

    /// Adds a node under an existing parent.
    pub fn add_to_parent(&mut self, mut child: SceneNode, parent: NodeId) -> Result<NodeId> {
        if parent >= self.nodes.len() {
            return Err(AnimationError::NodeOutOfBounds {
                context: "add_to_parent parent",
                index: parent,
            });
        }
        let id = self.nodes.len();
        child.parent = Some(parent);
        self.nodes.push(child);
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Re-parents `child` under `parent`, keeping both sides and the root
    /// list in sync.
    ///
    /// No cycle check is performed beyond rejecting `child == parent`.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        for (index, context) in [(child, "attach child"), (parent, "attach parent")] {
            if index >= self.nodes.len() {
                return Err(AnimationError::NodeOutOfBounds { context, index });
            }
        }
        if child == parent {
            return Err(AnimationError::InvalidHierarchy("node cannot be its own parent"));
        }

        // 1. Detach from the previous parent, or from the roots
        match self.nodes[child].parent {
            Some(old_parent) => self.nodes[old_parent].children.retain(|&c| c != child),
            None => self.root_nodes.retain(|&r| r != child),
        }

        // 2. Link both sides
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name)
    }

    // ========================================================================
    // Per-frame passes
    // ========================================================================

    /// Reset pass: clears every node's animated local transform and morph weights.
    pub fn reset_computed_locals(&mut self) {
        for node in &mut self.nodes {
            node.computed_local = None;
            node.morph_weights = None;
        }
    }

    /// Local pass: writes blended poses into touched nodes.
    ///
    /// `poses` is indexed by node id; `None` entries (untouched nodes) are
    /// left cleared so propagation falls back to the rest pose.
    pub fn apply_poses(&mut self, poses: &[Option<NodePose>], fallback: ComponentFallback) {
        for (id, pose) in poses.iter().enumerate() {
            let Some(pose) = pose else {
                continue;
            };
            let Some(node) = self.nodes.get_mut(id) else {
                debug!("pose for node {id} has no scene node, skipped");
                continue;
            };
            if pose.has_transform() {
                node.computed_local = Some(pose.resolve(fallback, &node.initial_local));
            }
            node.morph_weights = pose.weights;
        }
    }

    /// World pass: propagates from every root.
    pub fn update_world_transforms(&mut self) {
        transform_system::propagate(&mut self.nodes, &self.root_nodes);
    }

    /// World matrix of a node from the last propagation.
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.nodes.get(id).and_then(SceneNode::world_matrix)
    }

    /// Fills `out` with one world matrix per node. Nodes that were never
    /// reached by propagation report their rest pose.
    pub fn collect_world_matrices(&self, out: &mut Vec<Mat4>) {
        out.clear();
        out.extend(self.nodes.iter().map(|n| {
            n.computed_world
                .unwrap_or(n.initial_local)
                .to_matrix()
        }));
    }
}
