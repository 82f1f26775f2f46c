//! Keyframe animation: easing, timeline interpolation and playback.

pub mod clock;
mod easing;
mod engine;
mod keyframe;
mod timeline;

pub use clock::{Clock, FrameFlag, FrameScheduler, ManualClock, SystemClock};
pub use easing::Easing;
pub use engine::{AnimationEngine, FrameUpdate, PlaybackState, board_poses};
pub use keyframe::{Keyframe, KeyframeEvent, Pose};
pub use timeline::Timeline;

use serde::{Deserialize, Serialize};

/// Version tag written by [`AnimationEngine::export_data`].
pub const ANIMATION_FORMAT_VERSION: &str = "1.1";

/// Exported animation.
///
/// `duration` is informational; on import it is derived from the
/// keyframes again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    #[serde(default = "legacy_version")]
    pub version: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

fn legacy_version() -> String {
    "1.0".to_string()
}

impl AnimationData {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
