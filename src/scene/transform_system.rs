//! Transform System
//!
//! Propagates local transforms into world transforms over the node arena.
//! Only borrows the node slice and the root list, never the whole
//! [`SceneGraph`](crate::scene::SceneGraph), so callers can hold other
//! parts of the animator while it runs.
//!
//! For every node reachable from a root:
//! `world[n] = world[parent(n)] ∘ local[n]`, with the identity transform as
//! the implicit parent of each root. `local[n]` is the node's animated
//! transform if the current frame wrote one, otherwise its rest pose; it is
//! written back so that both `computed_local` and `computed_world` are
//! populated afterwards. Unreachable nodes are left untouched.

use log::debug;

use crate::scene::NodeId;
use crate::scene::node::SceneNode;
use crate::scene::transform::Transform;

/// Depth-first propagation from each root, in root order.
///
/// Uses an explicit stack instead of recursion so deep rigs cannot overflow
/// the call stack. Children are visited in their stored order.
pub fn propagate(nodes: &mut [SceneNode], roots: &[NodeId]) {
    for &root in roots {
        propagate_from(nodes, root, Transform::IDENTITY);
    }
}

/// Re-propagates the subtree under `root`, starting from its parent's last
/// computed world transform (identity if it has none).
pub fn propagate_subtree(nodes: &mut [SceneNode], root: NodeId) {
    let Some(node) = nodes.get(root) else {
        return;
    };

    let parent_world = node
        .parent
        .and_then(|p| nodes.get(p))
        .and_then(|p| p.computed_world)
        .unwrap_or(Transform::IDENTITY);

    propagate_from(nodes, root, parent_world);
}

fn propagate_from(nodes: &mut [SceneNode], root: NodeId, parent_world: Transform) {
    // Work stack: (node, parent world transform)
    let mut stack: Vec<(NodeId, Transform)> = Vec::with_capacity(64);
    stack.push((root, parent_world));

    while let Some((node_id, parent_world)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_id) else {
            debug!("node {node_id} referenced by hierarchy is out of range, skipped");
            continue;
        };

        let local = node.effective_local();
        let world = parent_world.compose(&local);
        node.computed_local = Some(local);
        node.computed_world = Some(world);

        // Push in reverse so children pop in stored order
        stack.extend(node.children.iter().rev().map(|&child| (child, world)));
    }
}
