//! Board-wide defaults.

use serde::{Deserialize, Serialize};

use crate::board::CourtType;
use crate::history::MAX_HISTORY_SIZE;

/// Default court width in board units.
pub const DEFAULT_COURT_WIDTH: f64 = 700.0;
/// Default court height in board units.
pub const DEFAULT_COURT_HEIGHT: f64 = 500.0;
/// Default court background color.
pub const DEFAULT_COURT_COLOR: &str = "#1a5f2a";
/// Duration reported by an empty timeline, in milliseconds.
pub const DEFAULT_ANIMATION_DURATION_MS: f64 = 5000.0;

/// Configuration used when creating a fresh board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfig {
    /// Court type for new boards.
    pub court_type: CourtType,
    /// Court width.
    pub court_width: f64,
    /// Court height.
    pub court_height: f64,
    /// Court background color.
    pub background_color: String,
    /// Offense token color.
    pub offense_color: String,
    /// Defense token color.
    pub defense_color: String,
    /// Grid spacing used by snapping.
    pub grid_size: f64,
    /// Maximum number of undo steps kept by the editor.
    pub history_size: usize,
    /// Duration of an animation without keyframes.
    pub default_duration_ms: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            court_type: CourtType::default(),
            court_width: DEFAULT_COURT_WIDTH,
            court_height: DEFAULT_COURT_HEIGHT,
            background_color: DEFAULT_COURT_COLOR.to_string(),
            offense_color: "#2563eb".to_string(),
            defense_color: "#dc2626".to_string(),
            grid_size: crate::snap::GRID_SIZE,
            history_size: MAX_HISTORY_SIZE,
            default_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
        }
    }
}
