//! Keyframe Sampling and Clip Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation
//! - Boundary clamping and exact-keyframe spans
//! - Interpolatable implementations (f32, Vec3, Quat, MorphWeightData)
//! - Track / channel validation errors
//! - AnimationClip duration and node grouping

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};

use myth_animator::animation::binding::TargetPath;
use myth_animator::animation::clip::{AnimationClip, ChannelTrack, DEFAULT_CLIP_DURATION, TrackData};
use myth_animator::animation::tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
use myth_animator::animation::values::{Interpolatable, MorphWeightData};
use myth_animator::errors::AnimationError;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn vec3_track(mode: InterpolationMode) -> KeyframeTrack<Vec3> {
    KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
        mode,
    )
}

// ============================================================================
// KeyframeTrack: Linear
// ============================================================================

#[test]
fn linear_vec3_quarter_point() {
    let track = vec3_track(InterpolationMode::Linear);
    let val = track.sample(0.25);
    assert!(vec3_approx(val, Vec3::new(2.5, 0.0, 0.0)), "got {val}");
}

#[test]
fn linear_f32_exact_keyframes() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 10.0, 20.0],
        InterpolationMode::Linear,
    );

    for (i, t) in [0.0, 1.0, 2.0].into_iter().enumerate() {
        let span = track.locate(t).unwrap();
        assert_eq!(span.index, i);
        assert_eq!(span.factor, 0.0);
        assert_eq!(track.sample(t), track.values[i]);
    }
}

#[test]
fn clamps_before_first_and_after_last() {
    let track = KeyframeTrack::new(
        vec![1.0, 2.0],
        vec![10.0_f32, 20.0],
        InterpolationMode::Linear,
    );

    assert_eq!(track.sample(-3.0), 10.0);
    assert_eq!(track.sample(0.999), 10.0);
    assert_eq!(track.sample(2.0), 20.0);
    assert_eq!(track.sample(50.0), 20.0);

    let span = track.locate(50.0).unwrap();
    assert_eq!(span.index, 1);
    assert_eq!(span.factor, 0.0);
}

#[test]
fn linear_quat_uses_shortest_path() {
    let start = Quat::from_rotation_y(0.0);
    // Same orientation as +90°, stored with the opposite sign
    let end = -Quat::from_rotation_y(FRAC_PI_2);
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![start, end], InterpolationMode::Linear);

    let mid = track.sample(0.5);
    let expected = Quat::from_rotation_y(FRAC_PI_2 / 2.0);
    assert!(mid.dot(expected).abs() > 1.0 - EPSILON, "got {mid:?}");
}

#[test]
fn quat_slerp_half_turn_stays_normalized() {
    let a = Quat::IDENTITY;
    let b = Quat::from_rotation_z(PI * 0.9);
    let mid = Quat::interpolate_linear(a, b, 0.5);
    assert!(approx(mid.length(), 1.0));
}

// ============================================================================
// KeyframeTrack: Step / CubicSpline
// ============================================================================

#[test]
fn step_holds_left_value() {
    let track = vec3_track(InterpolationMode::Step);
    assert_eq!(track.sample(0.0), Vec3::ZERO);
    assert_eq!(track.sample(0.99), Vec3::ZERO);
    assert_eq!(track.sample(1.0), Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn cubic_spline_evaluates_like_step() {
    let step = vec3_track(InterpolationMode::Step);
    let cubic = vec3_track(InterpolationMode::CubicSpline);
    for t in [-1.0, 0.0, 0.3, 0.5, 0.99, 1.0, 4.0] {
        assert_eq!(cubic.sample(t), step.sample(t), "t={t}");
    }
}

// ============================================================================
// KeyframeTrack: Degenerate tracks
// ============================================================================

#[test]
fn empty_track_returns_default() {
    let track: KeyframeTrack<Vec3> = KeyframeTrack::new(vec![], vec![], InterpolationMode::Linear);
    assert!(track.is_empty());
    assert!(track.locate(0.5).is_none());
    assert_eq!(track.sample(0.5), Vec3::ZERO);

    let rot: KeyframeTrack<Quat> = KeyframeTrack::new(vec![], vec![], InterpolationMode::Linear);
    assert_eq!(rot.sample(0.5), Quat::IDENTITY);
}

#[test]
fn nan_time_holds_first_keyframe() {
    let track = vec3_track(InterpolationMode::Linear);
    assert_eq!(track.sample(f32::NAN), Vec3::ZERO);
    assert_eq!(track.locate(f32::NAN).unwrap().factor, 0.0);

    let mut cursor = KeyframeCursor { last_index: 1 };
    assert_eq!(track.sample_with_cursor(f32::NAN, &mut cursor), Vec3::ZERO);
}

#[test]
fn single_keyframe_is_constant() {
    let track = KeyframeTrack::new(vec![0.5], vec![7.0_f32], InterpolationMode::Linear);
    for t in [-1.0, 0.5, 3.0] {
        assert_eq!(track.sample(t), 7.0);
    }
}

#[test]
fn cursor_sampling_matches_pure_sampling() {
    let track = KeyframeTrack::new(
        vec![0.0, 0.5, 1.0, 1.5, 2.0],
        vec![0.0_f32, 1.0, 4.0, 9.0, 16.0],
        InterpolationMode::Linear,
    );
    let mut cursor = KeyframeCursor::default();
    // Forward playback, then a loop wrap back to the start
    for t in [0.1, 0.3, 0.6, 1.1, 1.9, 2.5, 0.05, 0.7] {
        assert!(approx(track.sample_with_cursor(t, &mut cursor), track.sample(t)), "t={t}");
    }
}

#[test]
fn morph_weights_interpolate_componentwise() {
    let a = MorphWeightData::from_slice(&[0.0, 1.0]);
    let b = MorphWeightData::from_slice(&[1.0, 0.0, 0.5]);
    let mid = MorphWeightData::interpolate_linear(a, b, 0.5);
    assert!(approx(mid.weights[0], 0.5));
    assert!(approx(mid.weights[1], 0.5));
    assert!(approx(mid.weights[2], 0.25));
    assert_eq!(mid.weights[7], 0.0);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn try_new_rejects_length_mismatch() {
    let err = KeyframeTrack::try_new(vec![0.0, 1.0], vec![1.0_f32], InterpolationMode::Linear).unwrap_err();
    assert!(matches!(err, AnimationError::TrackLengthMismatch { times: 2, values: 1 }));
}

#[test]
fn try_new_rejects_unsorted_times() {
    let err = KeyframeTrack::try_new(vec![0.0, 1.0, 1.0], vec![0.0_f32; 3], InterpolationMode::Step).unwrap_err();
    assert!(matches!(err, AnimationError::UnsortedKeyframes { index: 2 }));

    assert!(KeyframeTrack::try_new(vec![0.0, 0.5], vec![0.0_f32; 2], InterpolationMode::Step).is_ok());
}

#[test]
fn channel_rejects_mismatched_target() {
    let data = TrackData::Quaternion(KeyframeTrack::new(vec![0.0], vec![Quat::IDENTITY], InterpolationMode::Linear));
    let err = ChannelTrack::new(0, TargetPath::Translation, data).unwrap_err();
    assert!(matches!(err, AnimationError::TargetMismatch { target: TargetPath::Translation, .. }));

    let data = TrackData::Vector3(vec3_track(InterpolationMode::Linear));
    assert!(ChannelTrack::new(0, TargetPath::Scale, data).is_ok());
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_duration_is_latest_keyframe() {
    let short = ChannelTrack::translation(0, vec3_track(InterpolationMode::Linear));
    let long = ChannelTrack::rotation(
        1,
        KeyframeTrack::new(vec![0.0, 2.5], vec![Quat::IDENTITY; 2], InterpolationMode::Linear),
    );
    let clip = AnimationClip::new("walk", vec![short, long]);
    assert!(approx(clip.duration, 2.5));
}

#[test]
fn clip_without_timing_uses_default_duration() {
    let empty = ChannelTrack::scale(0, KeyframeTrack::new(vec![], vec![], InterpolationMode::Linear));
    let clip = AnimationClip::new("pose", vec![empty]);
    assert_eq!(clip.duration, DEFAULT_CLIP_DURATION);

    let clip = AnimationClip::new("nothing", Vec::new());
    assert_eq!(clip.duration, DEFAULT_CLIP_DURATION);
}

#[test]
fn clip_groups_tracks_by_node() {
    let tracks = vec![
        ChannelTrack::translation(2, vec3_track(InterpolationMode::Linear)),
        ChannelTrack::translation(0, vec3_track(InterpolationMode::Linear)),
        ChannelTrack::scale(2, vec3_track(InterpolationMode::Linear)),
        ChannelTrack::rotation(0, KeyframeTrack::new(vec![0.0], vec![Quat::IDENTITY], InterpolationMode::Step)),
    ];
    let clip = AnimationClip::new("mixed", tracks);

    let groups: Vec<Vec<(usize, TargetPath)>> = clip
        .node_groups()
        .map(|g| g.iter().map(|t| (t.node, t.target)).collect())
        .collect();
    assert_eq!(
        groups,
        vec![
            vec![(0, TargetPath::Translation), (0, TargetPath::Rotation)],
            vec![(2, TargetPath::Translation), (2, TargetPath::Scale)],
        ]
    );
}
