//! Scene graph module
//!
//! Node hierarchy and transform propagation for the animator:
//! - SceneNode: arena node with parent/child indices and per-frame transforms
//! - Transform: translation / rotation / scale component
//! - SceneGraph: the node arena and root list
//! - transform_system: local → world propagation
//! - Skeleton: joints, inverse bind matrices and the joint matrix buffer

pub mod graph;
pub mod node;
pub mod skeleton;
pub mod transform;
pub mod transform_system;

// Re-export commonly used types
pub use graph::SceneGraph;
pub use node::SceneNode;
pub use skeleton::{Joint, JointMatrices, MAX_JOINTS, Skeleton};
pub use transform::Transform;

/// Index of a node in the [`SceneGraph`] arena.
pub type NodeId = usize;
