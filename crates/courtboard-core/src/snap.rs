//! Grid snapping for element placement.

use serde::{Deserialize, Serialize};

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Grid settings persisted with a board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub enabled: bool,
    pub size: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            size: GRID_SIZE,
        }
    }
}

impl GridSettings {
    /// Round `value` to the nearest grid line, or return it unchanged when
    /// the grid is off.
    pub fn snap(&self, value: f64) -> f64 {
        if !self.enabled || self.size <= 0.0 {
            return value;
        }
        (value / self.size).round() * self.size
    }
}
