use glam::{Quat, Vec3};

/// Number of morph target weights a single weights channel can drive.
pub const MAX_MORPH_TARGETS: usize = 8;

/// A keyframe value type.
///
/// `Default` is the zero/identity value returned when a track has no
/// keyframes to sample.
pub trait Interpolatable: Copy + Default {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MorphWeightData {
    pub weights: [f32; MAX_MORPH_TARGETS],
}

impl MorphWeightData {
    /// Builds weight data from a slice; entries beyond `MAX_MORPH_TARGETS`
    /// are dropped.
    #[must_use]
    pub fn from_slice(weights: &[f32]) -> Self {
        let mut data = Self::default();
        for (dst, src) in data.weights.iter_mut().zip(weights) {
            *dst = *src;
        }
        data
    }
}

impl Interpolatable for MorphWeightData {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        let mut result = MorphWeightData::default();
        for i in 0..MAX_MORPH_TARGETS {
            result.weights[i] = start.weights[i] + (end.weights[i] - start.weights[i]) * t;
        }
        result
    }
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    /// Shortest-path slerp.
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }
}
