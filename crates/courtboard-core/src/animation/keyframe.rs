//! Keyframes: a pose per element at one instant.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::Easing;
use crate::elements::ElementId;

/// Interpolatable fields of one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl Pose {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            rotation: None,
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Linear blend towards `to` by `t`.
    ///
    /// Rotation is blended only when both poses carry one; otherwise this
    /// pose's rotation is kept.
    pub fn lerp(&self, to: &Pose, t: f64) -> Pose {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Pose {
            x: mix(self.x, to.x),
            y: mix(self.y, to.y),
            rotation: match (self.rotation, to.rotation) {
                (Some(a), Some(b)) => Some(mix(a, b)),
                (rotation, _) => rotation,
            },
        }
    }
}

/// A discrete event fired when playback reaches a keyframe.
///
/// Only the `type` tag is interpreted; any other fields are carried through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl KeyframeEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Map::new(),
        }
    }
}

/// Events that fail to decode (no `type` tag, not an object) are dropped
/// with a warning instead of rejecting the whole keyframe.
fn lenient_events<'de, D>(deserializer: D) -> Result<Vec<KeyframeEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            log::warn!("Ignoring keyframe events that are not a list: {}", other);
            Vec::new()
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(event) => Some(event),
            Err(err) => {
                log::warn!("Dropping undecodable keyframe event: {}", err);
                None
            }
        })
        .collect())
}

/// Element poses at `time` milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f64,
    #[serde(default)]
    pub elements: BTreeMap<ElementId, Pose>,
    #[serde(default, deserialize_with = "lenient_events")]
    pub events: Vec<KeyframeEvent>,
    /// Governs the transition into this keyframe. Missing in 1.0 data.
    #[serde(default)]
    pub easing: Easing,
}

impl Keyframe {
    pub fn new(time: f64, elements: BTreeMap<ElementId, Pose>) -> Self {
        Self {
            time,
            elements,
            events: Vec::new(),
            easing: Easing::Linear,
        }
    }
}
