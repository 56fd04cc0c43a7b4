use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};
use myth_animator::animation::{
    AnimationClip, AnimationStateMachine, Animator, ChannelTrack, FrameSink, InterpolationMode, KeyframeTrack,
    StateConfig, StateId,
};
use myth_animator::scene::{Joint, JointMatrices, SceneGraph, SceneNode, Skeleton, Transform};
use myth_animator::settings::AnimatorSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stance {
    Idle,
    Wave,
}

impl StateId for Stance {
    fn ordinal(self) -> usize {
        self as usize
    }
}

/// Prints the forearm joint instead of uploading to a GPU.
struct ConsoleSink {
    frame: u32,
}

impl FrameSink for ConsoleSink {
    fn upload_joint_matrices(&mut self, joints: &JointMatrices) {
        if let Some(forearm) = joints.get(2) {
            let (_, rotation, translation) = forearm.to_scale_rotation_translation();
            let (axis, angle) = rotation.to_axis_angle();
            println!(
                "frame {:>3}: forearm at {translation:.2}, {:.1}° about {axis:.2}",
                self.frame,
                angle.to_degrees()
            );
        }
    }

    fn upload_world_matrices(&mut self, _world: &[Mat4]) {}
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // shoulder -> upper arm -> forearm
    let mut graph = SceneGraph::new();
    let shoulder = graph.add_node(SceneNode::new("shoulder", Transform::IDENTITY));
    let upper = graph.add_to_parent(SceneNode::new("upper_arm", Transform::from_translation(Vec3::X)), shoulder)?;
    let forearm = graph.add_to_parent(SceneNode::new("forearm", Transform::from_translation(Vec3::X)), upper)?;

    let skeleton = Skeleton::new(
        "arm",
        vec![
            Joint { node: shoulder, inverse_bind_matrix: Mat4::IDENTITY },
            Joint { node: upper, inverse_bind_matrix: Mat4::from_translation(-Vec3::X) },
            Joint { node: forearm, inverse_bind_matrix: Mat4::from_translation(-2.0 * Vec3::X) },
        ],
    );

    let mut animator = Animator::new(graph, Some(skeleton), AnimatorSettings::default())?;

    let idle = animator.add_clip(AnimationClip::new(
        "idle",
        vec![ChannelTrack::rotation(
            upper,
            KeyframeTrack::try_new(
                vec![0.0, 1.0, 2.0],
                vec![Quat::IDENTITY, Quat::from_rotation_z(0.1), Quat::IDENTITY],
                InterpolationMode::Linear,
            )?,
        )],
    ));
    let wave = animator.add_clip(AnimationClip::new(
        "wave",
        vec![ChannelTrack::rotation(
            forearm,
            KeyframeTrack::try_new(
                vec![0.0, 0.25, 0.5, 0.75],
                vec![
                    Quat::from_rotation_z(FRAC_PI_2),
                    Quat::from_rotation_z(FRAC_PI_2 * 0.5),
                    Quat::from_rotation_z(FRAC_PI_2),
                    Quat::from_rotation_z(FRAC_PI_2 * 0.5),
                ],
                InterpolationMode::Linear,
            )?,
        )],
    ));

    let mut machine = AnimationStateMachine::new(
        Stance::Idle,
        [
            (Stance::Idle, StateConfig::looping(idle).with_crossfade(0.3)),
            (Stance::Wave, StateConfig::once(wave, Stance::Idle).with_crossfade(0.2)),
        ],
    )?;

    let delta = 1.0 / 30.0;
    let mut sink = ConsoleSink { frame: 0 };
    for frame in 0..90_u32 {
        let time = frame as f32 * delta;
        if frame == 20 {
            println!("-> requesting wave: {:?}", machine.request_state(Stance::Wave));
        }

        let report = machine.update(time, delta, &mut animator);
        for diagnostic in &report.diagnostics {
            println!("diagnostic: {diagnostic}");
        }

        if frame % 5 == 0 {
            sink.frame = frame;
            println!(
                "state {:?} (blend {:.2}, {} clips)",
                machine.current_state(),
                machine.blend_factor(),
                report.contributing
            );
            animator.present(&mut sink);
        }
    }

    Ok(())
}
