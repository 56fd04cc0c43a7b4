use crate::animation::clip::ClipId;
use crate::errors::AnimationError;
use crate::settings::DEFAULT_TIME_TOLERANCE;

/// A request to sample a clip at a time derived from the frame time and
/// blend it in with `weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedAnimation {
    pub clip: ClipId,
    pub weight: f32,
    /// Start of the played range in clip time.
    pub start_time: f32,
    /// End of the played range in clip time.
    pub end_time: f32,
    /// Added to the frame time before the range mapping.
    pub time_offset: f32,
    /// Frame time at which a one-shot playback began. `None` loops.
    pub one_shot_start: Option<f32>,
}

impl WeightedAnimation {
    /// Continuous loop over `[start_time, end_time)`.
    #[must_use]
    pub fn looping(clip: ClipId, weight: f32, start_time: f32, end_time: f32) -> Self {
        Self {
            clip,
            weight,
            start_time,
            end_time,
            time_offset: 0.0,
            one_shot_start: None,
        }
    }

    /// Plays once from `started_at` and holds the last pose.
    #[must_use]
    pub fn one_shot(clip: ClipId, weight: f32, start_time: f32, end_time: f32, started_at: f32) -> Self {
        Self {
            one_shot_start: Some(started_at),
            ..Self::looping(clip, weight, start_time, end_time)
        }
    }

    #[must_use]
    pub fn with_offset(mut self, time_offset: f32) -> Self {
        self.time_offset = time_offset;
        self
    }

    /// Maps a frame time into clip time with the default tolerance.
    pub fn target_time(&self, frame_time: f32) -> Result<f32, AnimationError> {
        self.target_time_with_tolerance(frame_time, DEFAULT_TIME_TOLERANCE)
    }

    /// Maps a frame time into clip time.
    ///
    /// One-shot: `start + min(frame_time - one_shot_start + offset, end - start)`.
    /// Loop: `start + (frame_time + offset) mod (end - start)`.
    ///
    /// A result outside `[start - tolerance, end + tolerance]` is an error
    /// carrying the clamped time the caller should use instead.
    pub fn target_time_with_tolerance(&self, frame_time: f32, tolerance: f32) -> Result<f32, AnimationError> {
        let (start, end) = (self.start_time, self.end_time);
        let length = end - start;

        let time = if length <= 0.0 {
            start
        } else if let Some(began) = self.one_shot_start {
            start + ((frame_time - began) + self.time_offset).min(length)
        } else {
            start + (frame_time + self.time_offset).rem_euclid(length)
        };

        if time.is_finite() && time >= start - tolerance && time <= end + tolerance {
            return Ok(time);
        }

        let clamped = if time.is_finite() {
            time.clamp(start, end.max(start))
        } else {
            start
        };
        Err(AnimationError::TargetTimeOutOfRange {
            clip: self.clip,
            time,
            start,
            end,
            clamped,
        })
    }
}
