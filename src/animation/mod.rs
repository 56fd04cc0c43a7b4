pub mod values;
pub mod tracks;
pub mod clip;
pub mod binding;
pub mod pose;
pub mod weighted;
pub mod blender;
pub mod state_machine;
pub mod animator;

pub use values::{Interpolatable, MorphWeightData, MAX_MORPH_TARGETS};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeSpan, KeyframeTrack};
pub use clip::{AnimationClip, ChannelTrack, ClipId, TrackData, DEFAULT_CLIP_DURATION};
pub use binding::TargetPath;
pub use pose::{ComponentFallback, NodePose};
pub use weighted::WeightedAnimation;
pub use blender::{Blender, BLEND_WEIGHT_THRESHOLD, evaluate_clip};
pub use state_machine::{
    AnimationState, AnimationStateMachine, RepeatMode, RequestOutcome, StateConfig, StateId,
    WeightedAnimations,
};
pub use animator::{Animator, AssetSource, FrameReport, FrameSink};
