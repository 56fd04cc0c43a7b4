//! Animator Settings
//!
//! Runtime configuration of an [`Animator`](crate::Animator). All fields
//! have defaults, so a settings file only needs to name what it changes:
//!
//! ```rust,ignore
//! use myth_animator::AnimatorSettings;
//!
//! let settings = AnimatorSettings::from_json(r#"{ "component_fallback": "rest_pose" }"#)?;
//! assert_eq!(settings.joint_limit, myth_animator::MAX_JOINTS);
//! ```

use serde::{Deserialize, Serialize};

use crate::animation::pose::ComponentFallback;
use crate::errors::{AnimationError, Result};
use crate::scene::skeleton::MAX_JOINTS;

/// Slack around a clip's `[start, end]` range before a resolved target time
/// is reported as out of range.
pub const DEFAULT_TIME_TOLERANCE: f32 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorSettings {
    /// See [`DEFAULT_TIME_TOLERANCE`].
    pub time_tolerance: f32,
    /// Number of joint slots filled per frame. At most [`MAX_JOINTS`].
    pub joint_limit: usize,
    /// Fill-in for components no channel drove on a touched node.
    pub component_fallback: ComponentFallback,
}

impl Default for AnimatorSettings {
    fn default() -> Self {
        Self {
            time_tolerance: DEFAULT_TIME_TOLERANCE,
            joint_limit: MAX_JOINTS,
            component_fallback: ComponentFallback::Identity,
        }
    }
}

impl AnimatorSettings {
    /// Parses and validates settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.time_tolerance.is_finite() || self.time_tolerance < 0.0 {
            return Err(AnimationError::InvalidSettings(format!(
                "time_tolerance must be a non-negative number, got {}",
                self.time_tolerance
            )));
        }
        if self.joint_limit > MAX_JOINTS {
            return Err(AnimationError::InvalidSettings(format!(
                "joint_limit {} exceeds MAX_JOINTS ({MAX_JOINTS})",
                self.joint_limit
            )));
        }
        Ok(())
    }
}
