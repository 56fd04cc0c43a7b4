//! Frame evaluation benchmarks.
//!
//! A chain rig of `JOINTS` nodes, one clip animating rotation on every node,
//! evaluated as a single clip and as a two-clip crossfade.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Mat4, Quat, Vec3};

use myth_animator::animation::{
    AnimationClip, Animator, ChannelTrack, InterpolationMode, KeyframeTrack, WeightedAnimation,
};
use myth_animator::scene::{Joint, SceneGraph, SceneNode, Skeleton, Transform};
use myth_animator::settings::AnimatorSettings;

const JOINTS: usize = 64;
const KEYS: usize = 30;

fn chain_animator() -> Animator {
    let mut graph = SceneGraph::with_capacity(JOINTS);
    let mut parent = graph.add_node(SceneNode::new("bone_0", Transform::IDENTITY));
    for i in 1..JOINTS {
        parent = graph
            .add_to_parent(
                SceneNode::new(format!("bone_{i}"), Transform::from_translation(Vec3::Y)),
                parent,
            )
            .expect("parent exists");
    }

    let joints = (0..JOINTS)
        .map(|node| Joint {
            node,
            inverse_bind_matrix: Mat4::from_translation(-Vec3::Y * node as f32),
        })
        .collect();
    let skeleton = Skeleton::new("chain", joints);

    let mut animator = Animator::new(graph, Some(skeleton), AnimatorSettings::default()).expect("valid settings");

    for (name, axis) in [("bend", Vec3::Z), ("twist", Vec3::Y)] {
        let times: Vec<f32> = (0..KEYS).map(|k| k as f32 / (KEYS - 1) as f32).collect();
        let tracks = (0..JOINTS)
            .map(|node| {
                let values = times
                    .iter()
                    .map(|t| Quat::from_axis_angle(axis, (t * std::f32::consts::TAU + node as f32).sin() * 0.2))
                    .collect();
                ChannelTrack::rotation(node, KeyframeTrack::new(times.clone(), values, InterpolationMode::Linear))
            })
            .collect();
        animator.add_clip(AnimationClip::new(name, tracks));
    }
    animator
}

fn single_clip(c: &mut Criterion) {
    let mut animator = chain_animator();
    let weighted = [WeightedAnimation::looping(0, 1.0, 0.0, 1.0)];
    let mut time = 0.0_f32;

    c.bench_function("evaluate_frame_single_clip", |b| {
        b.iter(|| {
            time += 1.0 / 60.0;
            black_box(animator.evaluate_frame(black_box(&weighted), time));
        });
    });
}

fn crossfade(c: &mut Criterion) {
    let mut animator = chain_animator();
    let weighted = [
        WeightedAnimation::looping(0, 0.6, 0.0, 1.0),
        WeightedAnimation::looping(1, 0.4, 0.0, 1.0),
    ];
    let mut time = 0.0_f32;

    c.bench_function("evaluate_frame_crossfade", |b| {
        b.iter(|| {
            time += 1.0 / 60.0;
            black_box(animator.evaluate_frame(black_box(&weighted), time));
        });
    });
}

fn scrubbing(c: &mut Criterion) {
    let mut animator = chain_animator();
    let weighted = [WeightedAnimation::looping(0, 1.0, 0.0, 1.0)];
    let mut step = 0_u32;

    // Random-ish jumps defeat the keyframe cursor
    c.bench_function("evaluate_frame_scrubbing", |b| {
        b.iter(|| {
            step = step.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let time = (step >> 8) as f32 / (1 << 24) as f32;
            black_box(animator.evaluate_frame(black_box(&weighted), time));
        });
    });
}

criterion_group!(benches, single_clip, crossfade, scrubbing);
criterion_main!(benches);
