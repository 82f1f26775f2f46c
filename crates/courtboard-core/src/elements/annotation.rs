//! Text annotation.

use super::{BoardElement, ElementId, unassigned_z_index};
use crate::bounds::text_bounds;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default font size for new annotations.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_color() -> String {
    "#ffffff".to_string()
}

/// A single line of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub(crate) id: ElementId,
    /// Top-left anchor.
    #[serde(flatten)]
    pub position: Point,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "unassigned_z_index")]
    pub z_index: i64,
}

impl Annotation {
    pub fn new(id: ElementId, position: Point, content: String) -> Self {
        Self {
            id,
            position,
            content,
            font_size: DEFAULT_FONT_SIZE,
            color: default_color(),
            z_index: 0,
        }
    }
}

impl BoardElement for Annotation {
    fn id(&self) -> &str {
        &self.id
    }

    fn z_index(&self) -> i64 {
        self.z_index
    }

    fn set_z_index(&mut self, z_index: i64) {
        self.z_index = z_index;
    }

    fn bounds(&self) -> Option<Rect> {
        Some(text_bounds(self.position, &self.content, self.font_size))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        text_bounds(self.position, &self.content, self.font_size)
            .inflate(tolerance, tolerance)
            .contains(point)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
