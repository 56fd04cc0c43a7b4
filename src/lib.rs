#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod scene;
pub mod errors;
pub mod settings;
pub mod animation;

pub use scene::{Joint, JointMatrices, MAX_JOINTS, NodeId, SceneGraph, SceneNode, Skeleton, Transform};
pub use errors::{AnimationError, Result};
pub use settings::AnimatorSettings;
pub use animation::{
    AnimationClip, AnimationStateMachine, Animator, AssetSource, ChannelTrack, ClipId, FrameReport,
    FrameSink, InterpolationMode, KeyframeTrack, RepeatMode, StateConfig, StateId, WeightedAnimation,
};
