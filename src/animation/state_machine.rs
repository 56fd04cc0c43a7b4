//! Animation state machine.
//!
//! Sequences which clip plays for a caller-defined set of states (idle,
//! walk, attack, ...), with crossfades between them and automatic return
//! from one-shot states. Each frame it produces one or two
//! [`WeightedAnimation`]s for the blender:
//!
//! - no crossfade: `[(current, 1)]`
//! - crossfading: `[(previous, 1 - blend), (current, blend)]`, where
//!   `blend = min(crossfade_elapsed / crossfade_duration, 1)`
//!
//! The machine has no terminal state.
//!
//! ```rust,ignore
//! #[derive(Clone, Copy, PartialEq, Eq, Debug)]
//! enum Locomotion { Idle, Attack }
//!
//! impl StateId for Locomotion {
//!     fn ordinal(self) -> usize { self as usize }
//! }
//!
//! let mut machine = AnimationStateMachine::new(Locomotion::Idle, [
//!     (Locomotion::Idle, StateConfig::looping(idle_clip)),
//!     (Locomotion::Attack, StateConfig::once(attack_clip, Locomotion::Idle).with_crossfade(0.2)),
//! ])?;
//! machine.request_state(Locomotion::Attack);
//! machine.update(frame_time, delta_time, &mut animator);
//! ```

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::animation::animator::{Animator, FrameReport};
use crate::animation::clip::ClipId;
use crate::animation::weighted::WeightedAnimation;
use crate::errors::{AnimationError, Result};

/// Identifier of an animation state.
///
/// `ordinal` indexes the configuration table, so it should be small and dense.
pub trait StateId: Copy + Eq + fmt::Debug {
    fn ordinal(self) -> usize;
}

impl StateId for usize {
    #[inline]
    fn ordinal(self) -> usize {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Play once and hold the last pose until the return transition.
    Once,
    /// Loop this many times, then return.
    Count(u32),
    /// Loop until another state is requested.
    Forever,
}

impl RepeatMode {
    /// Number of plays before the state auto-returns, if it ever does.
    #[must_use]
    pub fn plays(self) -> Option<u32> {
        match self {
            RepeatMode::Once => Some(1),
            RepeatMode::Count(n) => Some(n),
            RepeatMode::Forever => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateConfig<S> {
    pub clip: ClipId,
    pub repeat: RepeatMode,
    /// Crossfade duration when entering this state. `<= 0` swaps instantly.
    #[serde(default)]
    pub crossfade_in: f32,
    #[serde(default = "default_interruptible")]
    pub interruptible: bool,
    /// State entered automatically once a `Once` / `Count` state finishes.
    #[serde(default)]
    pub return_state: Option<S>,
}

fn default_interruptible() -> bool {
    true
}

impl<S> StateConfig<S> {
    #[must_use]
    pub fn looping(clip: ClipId) -> Self {
        Self {
            clip,
            repeat: RepeatMode::Forever,
            crossfade_in: 0.0,
            interruptible: true,
            return_state: None,
        }
    }

    #[must_use]
    pub fn once(clip: ClipId, return_state: S) -> Self {
        Self {
            clip,
            repeat: RepeatMode::Once,
            crossfade_in: 0.0,
            interruptible: true,
            return_state: Some(return_state),
        }
    }

    #[must_use]
    pub fn with_repeat(mut self, repeat: RepeatMode) -> Self {
        self.repeat = repeat;
        self
    }

    #[must_use]
    pub fn with_crossfade(mut self, crossfade_in: f32) -> Self {
        self.crossfade_in = crossfade_in;
        self
    }

    #[must_use]
    pub fn with_interruptible(mut self, interruptible: bool) -> Self {
        self.interruptible = interruptible;
        self
    }
}

/// Outcome of a state change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Already in the requested state; nothing changed.
    AlreadyActive,
    /// The transition happened.
    Transitioned,
    /// The current state is not interruptible.
    Rejected,
    /// The requested state has no configuration.
    Unconfigured,
}

impl RequestOutcome {
    #[inline]
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::AlreadyActive | Self::Transitioned)
    }
}

/// Timers and states of the machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState<S> {
    pub current_state: S,
    pub previous_state: Option<S>,
    pub crossfade_elapsed: f32,
    pub crossfade_duration: f32,
    pub current_state_start: f32,
    pub previous_state_start: f32,
}

pub type WeightedAnimations = SmallVec<[WeightedAnimation; 2]>;

#[derive(Debug)]
pub struct AnimationStateMachine<S: StateId> {
    /// Configuration table indexed by state ordinal.
    configs: Vec<Option<StateConfig<S>>>,
    state: AnimationState<S>,
    /// Frame time of the latest update; transitions start here.
    clock: f32,
    weighted: WeightedAnimations,
    /// Problems met by the latest advance, handed to the frame report.
    diagnostics: Vec<AnimationError>,
}

impl<S: StateId> AnimationStateMachine<S> {
    /// Builds the configuration table and enters `initial` at time 0.
    pub fn new(initial: S, configs: impl IntoIterator<Item = (S, StateConfig<S>)>) -> Result<Self> {
        let mut table: Vec<Option<StateConfig<S>>> = Vec::new();
        for (state, config) in configs {
            let ordinal = state.ordinal();
            if table.len() <= ordinal {
                table.resize_with(ordinal + 1, || None);
            }
            table[ordinal] = Some(config);
        }

        let configured = |state: S| table.get(state.ordinal()).is_some_and(Option::is_some);
        if !configured(initial) {
            return Err(AnimationError::UnconfiguredState(format!("{initial:?}")));
        }
        if let Some(missing) = table
            .iter()
            .flatten()
            .filter_map(|config| config.return_state)
            .find(|&state| !configured(state))
        {
            return Err(AnimationError::UnconfiguredState(format!("{missing:?} (return state)")));
        }

        Ok(Self {
            configs: table,
            state: AnimationState {
                current_state: initial,
                previous_state: None,
                crossfade_elapsed: 0.0,
                crossfade_duration: 0.0,
                current_state_start: 0.0,
                previous_state_start: 0.0,
            },
            clock: 0.0,
            weighted: SmallVec::new(),
            diagnostics: Vec::new(),
        })
    }

    /// Checks every configured clip against the clips registered with `animator`.
    pub fn validate(&self, animator: &Animator) -> Result<()> {
        match self
            .configs
            .iter()
            .flatten()
            .find(|config| animator.clip(config.clip).is_none())
        {
            Some(config) => Err(AnimationError::UnknownClip(config.clip)),
            None => Ok(()),
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &AnimationState<S> {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn current_state(&self) -> S {
        self.state.current_state
    }

    #[inline]
    #[must_use]
    pub fn previous_state(&self) -> Option<S> {
        self.state.previous_state
    }

    #[must_use]
    pub fn config(&self, state: S) -> Option<&StateConfig<S>> {
        self.configs.get(state.ordinal()).and_then(Option::as_ref)
    }

    /// Crossfade progress in `[0, 1]`; 1 when no crossfade is running.
    #[must_use]
    pub fn blend_factor(&self) -> f32 {
        if self.state.previous_state.is_none() || self.state.crossfade_duration <= 0.0 {
            return 1.0;
        }
        (self.state.crossfade_elapsed / self.state.crossfade_duration).min(1.0)
    }

    /// Weighted animations produced by the latest update.
    #[inline]
    #[must_use]
    pub fn weighted_animations(&self) -> &[WeightedAnimation] {
        &self.weighted
    }

    /// Moves to `new` unless the current state is not interruptible.
    pub fn request_state(&mut self, new: S) -> RequestOutcome {
        if new == self.state.current_state {
            return RequestOutcome::AlreadyActive;
        }
        if self.config(new).is_none() {
            warn!("requested animation state {new:?} has no configuration, ignored");
            return RequestOutcome::Unconfigured;
        }
        let interruptible = self
            .config(self.state.current_state)
            .is_some_and(|c| c.interruptible);
        if !interruptible {
            debug!(
                "state {:?} is not interruptible, request for {new:?} rejected",
                self.state.current_state
            );
            return RequestOutcome::Rejected;
        }
        self.transition(new);
        RequestOutcome::Transitioned
    }

    /// Moves to `new` regardless of interruptibility. Forcing the current
    /// state restarts it.
    pub fn force_state(&mut self, new: S) -> RequestOutcome {
        if self.config(new).is_none() {
            warn!("forced animation state {new:?} has no configuration, ignored");
            return RequestOutcome::Unconfigured;
        }
        self.transition(new);
        RequestOutcome::Transitioned
    }

    fn transition(&mut self, new: S) {
        let crossfade_in = self.config(new).map_or(0.0, |c| c.crossfade_in);
        let old = self.state.current_state;
        let restarting = old == new;

        if crossfade_in <= 0.0 || restarting {
            self.state.previous_state = None;
            self.state.crossfade_duration = 0.0;
        } else {
            self.state.previous_state = Some(old);
            self.state.previous_state_start = self.state.current_state_start;
            self.state.crossfade_duration = crossfade_in;
        }
        self.state.crossfade_elapsed = 0.0;
        self.state.current_state = new;
        self.state.current_state_start = self.clock;

        debug!("animation state {old:?} -> {new:?} at {} (crossfade {crossfade_in})", self.clock);
    }

    /// Advances timers and rebuilds the weighted animation list without
    /// evaluating it. `clip_duration` resolves a clip id to its duration.
    pub fn advance(
        &mut self,
        frame_time: f32,
        delta_time: f32,
        clip_duration: impl Fn(ClipId) -> Option<f32>,
    ) -> &[WeightedAnimation] {
        self.clock = frame_time;

        // 1. Auto-return from finished one-shot / counted states
        let finished = self.config(self.state.current_state).and_then(|config| {
            let plays = config.repeat.plays()?;
            let return_state = config.return_state?;
            let duration = clip_duration(config.clip)?;
            let elapsed = frame_time - self.state.current_state_start;
            (elapsed >= duration * plays as f32).then_some(return_state)
        });
        if let Some(return_state) = finished {
            if self.config(return_state).is_some() {
                self.transition(return_state);
            } else {
                warn!(
                    "return state {return_state:?} of {:?} has no configuration, staying",
                    self.state.current_state
                );
            }
        }

        // 2. Crossfade progress
        if self.state.previous_state.is_some() {
            self.state.crossfade_elapsed += delta_time;
            if self.state.crossfade_elapsed >= self.state.crossfade_duration {
                self.state.previous_state = None;
            }
        }

        // 3. Weighted list: previous first, then current
        self.weighted.clear();
        self.diagnostics.clear();
        let blend = self.blend_factor();
        if let Some(previous) = self.state.previous_state {
            let start = self.state.previous_state_start;
            match self.entry_for(previous, 1.0 - blend, start, &clip_duration) {
                Ok(entry) => self.weighted.push(entry),
                Err(err) => self.diagnostics.push(err),
            }
        }
        let current_weight = if self.state.previous_state.is_some() { blend } else { 1.0 };
        let start = self.state.current_state_start;
        match self.entry_for(self.state.current_state, current_weight, start, &clip_duration) {
            Ok(entry) => self.weighted.push(entry),
            Err(err) => self.diagnostics.push(err),
        }

        &self.weighted
    }

    /// Problems met by the latest [`advance`](Self::advance): states whose
    /// clip is unknown produce no weighted entry.
    #[inline]
    #[must_use]
    pub fn diagnostics(&self) -> &[AnimationError] {
        &self.diagnostics
    }

    /// Advances the machine and evaluates the frame on `animator`.
    ///
    /// Diagnostics from the machine come first in the report.
    pub fn update(&mut self, frame_time: f32, delta_time: f32, animator: &mut Animator) -> FrameReport {
        self.advance(frame_time, delta_time, |clip| animator.clip_duration(clip));
        let mut report = animator.evaluate_frame(&self.weighted, frame_time);
        if !self.diagnostics.is_empty() {
            let mut diagnostics = std::mem::take(&mut self.diagnostics);
            diagnostics.append(&mut report.diagnostics);
            report.diagnostics = diagnostics;
        }
        report
    }

    fn entry_for(
        &self,
        state: S,
        weight: f32,
        started_at: f32,
        clip_duration: &impl Fn(ClipId) -> Option<f32>,
    ) -> Result<WeightedAnimation> {
        let config = self
            .config(state)
            .ok_or_else(|| AnimationError::UnconfiguredState(format!("{state:?}")))?;
        let Some(duration) = clip_duration(config.clip) else {
            warn!("state {state:?} plays unknown clip {}, ignored", config.clip);
            return Err(AnimationError::UnknownClip(config.clip));
        };
        Ok(match config.repeat {
            RepeatMode::Once => WeightedAnimation::one_shot(config.clip, weight, 0.0, duration, started_at),
            // Loops restart from the clip's first frame when the state is entered
            RepeatMode::Count(_) | RepeatMode::Forever => {
                WeightedAnimation::looping(config.clip, weight, 0.0, duration).with_offset(-started_at)
            }
        })
    }
}
