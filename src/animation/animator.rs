//! Animator: owns clips, scene graph and skeleton, and evaluates frames.
//!
//! [`Animator::evaluate_frame`] is the only way to advance the output, and
//! always runs the passes in order:
//!
//! 1. reset every node's animated local transform
//! 2. blend the weighted clips into per-node poses
//! 3. write the poses into the touched nodes
//! 4. propagate local → world from every root
//! 5. rebuild per-node world matrices and skinning matrices
//!
//! The renderer reads the results afterwards through [`Animator::present`]
//! or the accessors.

use glam::Mat4;
use log::{trace, warn};
use rustc_hash::FxHashMap;

use crate::animation::blender::Blender;
use crate::animation::clip::{AnimationClip, ClipId};
use crate::animation::weighted::WeightedAnimation;
use crate::errors::{AnimationError, Result};
use crate::scene::graph::SceneGraph;
use crate::scene::skeleton::{JointMatrices, Skeleton, build_joint_matrices};
use crate::settings::AnimatorSettings;

/// Supplies decoded scene, clip and skin data.
pub trait AssetSource {
    fn scene_graph(&self) -> Result<SceneGraph>;
    fn clips(&self) -> Result<Vec<AnimationClip>>;
    fn skeleton(&self) -> Result<Option<Skeleton>>;
}

/// Receives the per-frame output.
pub trait FrameSink {
    fn upload_joint_matrices(&mut self, joints: &JointMatrices);
    fn upload_world_matrices(&mut self, world: &[Mat4]);
}

/// Summary of one `evaluate_frame` call.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// False when there was nothing to evaluate; outputs kept the previous frame.
    pub evaluated: bool,
    /// Weighted animations that actually contributed.
    pub contributing: usize,
    /// Non-fatal problems met while evaluating.
    pub diagnostics: Vec<AnimationError>,
}

pub struct Animator {
    clips: Vec<AnimationClip>,
    clip_names: FxHashMap<String, ClipId>,

    scene: SceneGraph,
    skeleton: Option<Skeleton>,
    settings: AnimatorSettings,

    blender: Blender,

    // === Output ===
    joint_matrices: JointMatrices,
    world_matrices: Vec<Mat4>,
    frame_count: u64,
}

impl Animator {
    pub fn new(mut scene: SceneGraph, skeleton: Option<Skeleton>, settings: AnimatorSettings) -> Result<Self> {
        settings.validate()?;

        if let Some(skeleton) = &skeleton {
            for joint in skeleton.dangling_joints(&scene) {
                warn!(
                    "joint {joint} of skeleton '{}' references a node outside the scene, it will stay identity",
                    skeleton.name
                );
            }
        }

        // Rest pose output until the first evaluated frame
        scene.update_world_transforms();
        let mut world_matrices = Vec::with_capacity(scene.len());
        scene.collect_world_matrices(&mut world_matrices);
        let mut joint_matrices = JointMatrices::new();
        if let Some(skeleton) = &skeleton {
            build_joint_matrices(skeleton, &scene, settings.joint_limit, &mut joint_matrices);
        }

        Ok(Self {
            clips: Vec::new(),
            clip_names: FxHashMap::default(),
            scene,
            skeleton,
            settings,
            blender: Blender::new(),
            joint_matrices,
            world_matrices,
            frame_count: 0,
        })
    }

    /// Builds an animator from everything an asset source provides.
    pub fn from_source(source: &impl AssetSource, settings: AnimatorSettings) -> Result<Self> {
        let mut animator = Self::new(source.scene_graph()?, source.skeleton()?, settings)?;
        for clip in source.clips()? {
            animator.add_clip(clip);
        }
        Ok(animator)
    }

    // ========================================================================
    // Clips
    // ========================================================================

    /// Registers a clip. A later clip with the same name shadows the earlier
    /// one for [`clip_by_name`](Self::clip_by_name).
    pub fn add_clip(&mut self, clip: AnimationClip) -> ClipId {
        let id = self.clips.len();
        self.clip_names.insert(clip.name.clone(), id);
        self.clips.push(clip);
        id
    }

    #[inline]
    #[must_use]
    pub fn clip(&self, id: ClipId) -> Option<&AnimationClip> {
        self.clips.get(id)
    }

    #[inline]
    #[must_use]
    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    #[must_use]
    pub fn clip_by_name(&self, name: &str) -> Option<ClipId> {
        self.clip_names.get(name).copied()
    }

    #[must_use]
    pub fn clip_duration(&self, id: ClipId) -> Option<f32> {
        self.clips.get(id).map(|c| c.duration)
    }

    // ========================================================================
    // Frame evaluation
    // ========================================================================

    /// Evaluates one frame for the given weighted clips.
    ///
    /// An empty list is a no-op: every output keeps the previous frame.
    pub fn evaluate_frame(&mut self, weighted: &[WeightedAnimation], frame_time: f32) -> FrameReport {
        if weighted.is_empty() {
            trace!("frame at {frame_time}: no active animations, output retained");
            return FrameReport::default();
        }

        // 1. Reset pass
        self.scene.reset_computed_locals();

        // 2. Sample + blend
        let contributing = self.blender.blend_with_tolerance(
            &self.clips,
            weighted,
            frame_time,
            self.scene.len(),
            self.settings.time_tolerance,
        );

        // 3. Local pass
        self.scene
            .apply_poses(self.blender.poses(), self.settings.component_fallback);

        // 4. World pass
        self.scene.update_world_transforms();

        // 5. Output buffers
        self.scene.collect_world_matrices(&mut self.world_matrices);
        if let Some(skeleton) = &self.skeleton {
            build_joint_matrices(
                skeleton,
                &self.scene,
                self.settings.joint_limit,
                &mut self.joint_matrices,
            );
        }

        self.frame_count += 1;
        FrameReport {
            evaluated: true,
            contributing,
            diagnostics: self.blender.take_diagnostics(),
        }
    }

    /// Hands the latest output to the renderer.
    pub fn present(&self, sink: &mut impl FrameSink) {
        if self.skeleton.is_some() {
            sink.upload_joint_matrices(&self.joint_matrices);
        }
        sink.upload_world_matrices(&self.world_matrices);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &AnimatorSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn joint_matrices(&self) -> &JointMatrices {
        &self.joint_matrices
    }

    /// One world matrix per scene node, from the latest evaluated frame.
    #[inline]
    #[must_use]
    pub fn world_matrices(&self) -> &[Mat4] {
        &self.world_matrices
    }

    /// Number of frames evaluated so far (skipped frames not counted).
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
