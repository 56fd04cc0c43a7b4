//! Error Types
//!
//! This module defines the error types used throughout the animator.
//!
//! # Overview
//!
//! The main error type [`AnimationError`] covers:
//! - Malformed keyframe data handed over by an asset source
//! - Invalid node / clip / state references
//! - Per-frame playback diagnostics (clamped target times)
//! - Settings loading failures
//!
//! Construction-time checks return [`Result<T>`]. Problems found while a frame
//! is being evaluated are never fatal: they are logged and collected into the
//! frame report instead, so a running frame loop keeps going.
//!
//! ```rust,ignore
//! use myth_animator::errors::{AnimationError, Result};
//!
//! fn build_track() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::animation::binding::TargetPath;
use crate::animation::clip::ClipId;

/// The main error type for the animator.
#[derive(Error, Debug)]
pub enum AnimationError {
    // ========================================================================
    // Reference Errors
    // ========================================================================
    /// The clip id is not registered with the animator.
    #[error("Unknown animation clip: {0}")]
    UnknownClip(ClipId),

    /// Node index out of bounds.
    #[error("Node index out of bounds: {context} (index: {index})")]
    NodeOutOfBounds {
        /// Description of what was being accessed
        context: &'static str,
        /// The invalid index
        index: usize,
    },

    /// A hierarchy edit that would break the forest shape.
    #[error("Invalid hierarchy edit: {0}")]
    InvalidHierarchy(&'static str),

    /// A state id with no configuration entry in the state table.
    #[error("No configuration for animation state {0}")]
    UnconfiguredState(String),

    // ========================================================================
    // Keyframe Data Errors
    // ========================================================================
    /// `times` and `values` disagree in length.
    #[error("Keyframe track has {times} times but {values} values")]
    TrackLengthMismatch { times: usize, values: usize },

    /// Keyframe times must be strictly increasing.
    #[error("Keyframe times are not strictly increasing at index {index}")]
    UnsortedKeyframes { index: usize },

    /// The target property does not accept the track's value kind.
    #[error("Target {target:?} cannot be driven by {data} keyframes")]
    TargetMismatch {
        target: TargetPath,
        data: &'static str,
    },

    // ========================================================================
    // Playback Diagnostics
    // ========================================================================
    /// A weighted playback request resolved to a time outside its clip range.
    /// Evaluation continues with `clamped`.
    #[error("Target time {time} for clip {clip} outside [{start}, {end}], clamped to {clamped}")]
    TargetTimeOutOfRange {
        clip: ClipId,
        time: f32,
        start: f32,
        end: f32,
        clamped: f32,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings failed validation.
    #[error("Invalid animator settings: {0}")]
    InvalidSettings(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by an asset source implementation.
    #[error("Asset source error: {0}")]
    AssetSource(String),
}

/// Alias for `Result<T, AnimationError>`.
pub type Result<T> = std::result::Result<T, AnimationError>;
