//! Saved play: a board plus its optional animation.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationData;
use crate::board::BoardData;

/// A named, persisted play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayDocument {
    pub id: String,
    pub name: String,
    pub board: BoardData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationData>,
}

impl PlayDocument {
    /// New document with a fresh id.
    pub fn new(
        name: impl Into<String>,
        board: BoardData,
        animation: Option<AnimationData>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            board,
            animation,
        }
    }

    /// Empty board named "Untitled".
    pub fn untitled() -> Self {
        Self::new("Untitled", crate::Board::new().export_data(), None)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
