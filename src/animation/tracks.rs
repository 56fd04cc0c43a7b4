use crate::animation::values::Interpolatable;
use crate::errors::{AnimationError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    /// Accepted as input, evaluated exactly like [`InterpolationMode::Step`].
    /// Values are one per keyframe (no tangents are stored).
    CubicSpline,
}

const MAX_SCAN_OFFSET: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// Result of bracketing a sample time: the left keyframe and the
/// normalized position towards the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeSpan {
    pub index: usize,
    pub factor: f32,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Creates a track without validating it. Data handed over by an asset
    /// source is trusted to be sorted and of matching length.
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Creates a track, checking that lengths match and times strictly increase.
    pub fn try_new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Result<Self> {
        if times.len() != values.len() {
            return Err(AnimationError::TrackLengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if let Some(index) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(AnimationError::UnsortedKeyframes { index: index + 1 });
        }
        Ok(Self::new(times, values, interpolation))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last keyframe, if any.
    #[inline]
    #[must_use]
    pub fn last_time(&self) -> Option<f32> {
        self.times.last().copied()
    }

    /// Finds the keyframe pair bracketing `time`.
    ///
    /// Returns `None` for an empty track. Times before the first keyframe
    /// and at or after the last one clamp to that keyframe with `factor = 0`.
    #[must_use]
    pub fn locate(&self, time: f32) -> Option<KeyframeSpan> {
        if let Some(span) = self.boundary_span(time) {
            return span;
        }
        // partition_point finds the first index where t > time, i.e. next_index
        let next_idx = self.times.partition_point(|&t| t <= time);
        Some(self.span_at(next_idx.saturating_sub(1), time))
    }

    /// Same as [`locate`](Self::locate) but starts searching from the cursor
    /// and updates it. Sequential playback hits in O(1).
    pub fn locate_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<KeyframeSpan> {
        if let Some(span) = self.boundary_span(time) {
            if let Some(span) = span {
                cursor.last_index = span.index;
            }
            return span;
        }

        // From here on: times[0] <= time < times[last], len >= 2
        let last = self.times.len() - 1;
        let i = cursor.last_index.min(last - 1);

        let found = if time >= self.times[i] {
            // Forward scan: playback or fast-forward
            (i..last)
                .take(MAX_SCAN_OFFSET + 1)
                .find(|&idx| time < self.times[idx + 1])
        } else {
            // Backward scan: reverse playback or loop reset
            (0..i)
                .rev()
                .take(MAX_SCAN_OFFSET)
                .find(|&idx| time >= self.times[idx])
        };

        let index = found.unwrap_or_else(|| {
            // Large jump (scrubbing / loop wrap): binary search
            self.times.partition_point(|&t| t <= time).saturating_sub(1)
        });
        cursor.last_index = index;
        Some(self.span_at(index, time))
    }

    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        self.locate(time)
            .map_or_else(T::default, |span| self.sample_span(span))
    }

    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> T {
        self.locate_with_cursor(time, cursor)
            .map_or_else(T::default, |span| self.sample_span(span))
    }

    /// Evaluates a located span according to the interpolation mode.
    #[must_use]
    pub fn sample_span(&self, span: KeyframeSpan) -> T {
        let current = self.value_at(span.index);
        match self.interpolation {
            // TODO: evaluate true Hermite splines once tracks carry in/out tangents.
            InterpolationMode::Step | InterpolationMode::CubicSpline => current,
            InterpolationMode::Linear => {
                if span.factor <= 0.0 || span.index + 1 >= self.values.len() {
                    return current;
                }
                T::interpolate_linear(current, self.value_at(span.index + 1), span.factor)
            }
        }
    }

    /// Missing values (fewer values than times) read as the zero value.
    fn value_at(&self, index: usize) -> T {
        self.values.get(index).copied().unwrap_or_default()
    }

    /// Handles the empty / single keyframe / out-of-range cases.
    /// `Some(x)` means the answer is `x` and no search is needed.
    fn boundary_span(&self, time: f32) -> Option<Option<KeyframeSpan>> {
        let len = self.times.len();
        if len == 0 {
            return Some(None);
        }
        // NaN compares false everywhere and would leak into the factor
        if len == 1 || time.is_nan() || time < self.times[0] {
            return Some(Some(KeyframeSpan { index: 0, factor: 0.0 }));
        }
        if time >= self.times[len - 1] {
            return Some(Some(KeyframeSpan {
                index: len - 1,
                factor: 0.0,
            }));
        }
        None
    }

    fn span_at(&self, index: usize, time: f32) -> KeyframeSpan {
        let t0 = self.times[index];
        let t1 = self.times[index + 1];
        let dt = t1 - t0;

        // Zero-length interval holds the left keyframe
        let factor = if dt > 0.0 { (time - t0) / dt } else { 0.0 };
        KeyframeSpan {
            index,
            factor: factor.clamp(0.0, 1.0),
        }
    }
}
