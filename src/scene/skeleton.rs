use glam::Mat4;
use log::{debug, warn};

use crate::scene::NodeId;
use crate::scene::graph::SceneGraph;

/// Maximum joints per skeleton. Sizes the GPU uniform array, so the shader
/// side must agree with this value.
pub const MAX_JOINTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub node: NodeId,
    /// Transforms vertices from mesh space into this joint's local space.
    pub inverse_bind_matrix: Mat4,
}

#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,

    // Joint list: ordered array, corresponds to joint index in shader
    // joints[i] corresponds to u_joints[i] in shader
    joints: Vec<Joint>,
}

impl Skeleton {
    /// Creates a skeleton. Joints beyond [`MAX_JOINTS`] are dropped.
    #[must_use]
    pub fn new(name: &str, mut joints: Vec<Joint>) -> Self {
        if joints.len() > MAX_JOINTS {
            warn!(
                "skeleton '{name}' has {} joints, truncating to {MAX_JOINTS}",
                joints.len()
            );
            joints.truncate(MAX_JOINTS);
        }
        Self {
            name: name.to_string(),
            joints,
        }
    }

    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Joints whose node is not in `graph`.
    pub fn dangling_joints<'a>(&'a self, graph: &'a SceneGraph) -> impl Iterator<Item = usize> + 'a {
        self.joints
            .iter()
            .enumerate()
            .filter(|(_, joint)| joint.node >= graph.len())
            .map(|(i, _)| i)
    }
}

/// Fixed-size skinning matrix buffer handed to the renderer.
///
/// Always fully defined: slots without a joint hold the identity matrix.
/// Matrices are glam column-major.
#[derive(Debug, Clone)]
pub struct JointMatrices {
    matrices: Box<[Mat4; MAX_JOINTS]>,
}

impl JointMatrices {
    #[must_use]
    pub fn new() -> Self {
        Self {
            matrices: Box::new([Mat4::IDENTITY; MAX_JOINTS]),
        }
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Mat4] {
        self.matrices.as_slice()
    }

    /// Byte view for uniform upload.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.matrices.as_slice())
    }

    #[inline]
    #[must_use]
    pub fn get(&self, joint: usize) -> Option<&Mat4> {
        self.matrices.get(joint)
    }
}

impl Default for JointMatrices {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the skinning matrices for the current pose.
///
/// Must run after the world pass of the current frame.
/// `joint_matrices[j] = world(joint.node) * inverse_bind_matrix` for the first
/// `min(joint_count, limit)` joints; every other slot is the identity. A joint
/// whose node is out of range, or was never reached by propagation, gets the
/// identity too.
pub fn build_joint_matrices(skeleton: &Skeleton, graph: &SceneGraph, limit: usize, output: &mut JointMatrices) {
    let active = skeleton.joints.len().min(limit).min(MAX_JOINTS);

    for (slot, joint) in output.matrices.iter_mut().zip(&skeleton.joints[..active]) {
        *slot = match graph.world_matrix(joint.node) {
            Some(world) => world * joint.inverse_bind_matrix,
            None => {
                debug!(
                    "joint node {} of skeleton '{}' has no world transform, using identity",
                    joint.node, skeleton.name
                );
                Mat4::IDENTITY
            }
        };
    }

    // Pad the rest so the fixed-size output is always defined
    for slot in &mut output.matrices[active..] {
        *slot = Mat4::IDENTITY;
    }
}
