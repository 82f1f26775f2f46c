//! Point-anchored shapes: screens, circles, rectangles and the ball.

use super::{BoardElement, ElementId, unassigned_z_index};
use crate::bounds::{centered_bounds, ellipse_bounds};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Height used for the bounds of a screen marker.
pub const SCREEN_BOUNDS_HEIGHT: f64 = 40.0;
/// Thickness of a screen marker for hit testing.
pub const SCREEN_HIT_HEIGHT: f64 = 10.0;
/// Normalized ellipse distance still counted as a hit on a circle.
const CIRCLE_HIT_RATIO: f64 = 1.3;

fn default_white() -> String {
    "#ffffff".to_string()
}

fn default_screen_width() -> f64 {
    40.0
}

fn default_radius() -> f64 {
    30.0
}

fn default_ball_radius() -> f64 {
    12.0
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_opacity() -> f64 {
    0.7
}

/// A screen marker (a short bar perpendicular to the screener's stance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub(crate) id: ElementId,
    #[serde(flatten)]
    pub position: Point,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_screen_width")]
    pub width: f64,
    #[serde(default = "default_white")]
    pub color: String,
    #[serde(default = "unassigned_z_index")]
    pub z_index: i64,
}

impl Screen {
    pub fn new(id: ElementId, position: Point) -> Self {
        Self {
            id,
            position,
            rotation: 0.0,
            width: default_screen_width(),
            color: default_white(),
            z_index: 0,
        }
    }
}

/// An ellipse outline or zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub(crate) id: ElementId,
    #[serde(flatten)]
    pub position: Point,
    #[serde(default = "default_radius")]
    pub radius_x: f64,
    #[serde(default = "default_radius")]
    pub radius_y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub fill: String,
    #[serde(default = "default_white")]
    pub stroke: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "unassigned_z_index")]
    pub z_index: i64,
}

impl Circle {
    pub fn new(id: ElementId, position: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            id,
            position,
            radius_x,
            radius_y,
            rotation: 0.0,
            fill: "transparent".to_string(),
            stroke: default_white(),
            stroke_width: default_stroke_width(),
            opacity: default_opacity(),
            z_index: 0,
        }
    }
}

/// A filled rectangle (zones, paint areas).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub(crate) id: ElementId,
    /// Center of the rectangle.
    #[serde(flatten)]
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub fill: String,
    #[serde(default = "default_white")]
    pub stroke: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "unassigned_z_index")]
    pub z_index: i64,
}

impl Rectangle {
    pub fn new(id: ElementId, position: Point, width: f64, height: f64) -> Self {
        Self {
            id,
            position,
            width,
            height,
            rotation: 0.0,
            fill: "rgba(255, 255, 255, 0.2)".to_string(),
            stroke: default_white(),
            stroke_width: default_stroke_width(),
            z_index: 0,
        }
    }
}

/// The ball. A board holds at most one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ball {
    pub(crate) id: ElementId,
    #[serde(flatten)]
    pub position: Point,
    #[serde(default = "default_ball_radius")]
    pub radius: f64,
    #[serde(default = "unassigned_z_index")]
    pub z_index: i64,
}

impl Ball {
    pub fn new(id: ElementId, position: Point) -> Self {
        Self {
            id,
            position,
            radius: default_ball_radius(),
            z_index: 0,
        }
    }
}

/// Enum wrapper for all point-anchored shapes (tagged by `type`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Screen(Screen),
    Circle(Circle),
    Rectangle(Rectangle),
    Ball(Ball),
}

impl Shape {
    /// Center point of the shape.
    pub fn position(&self) -> Point {
        match self {
            Shape::Screen(s) => s.position,
            Shape::Circle(s) => s.position,
            Shape::Rectangle(s) => s.position,
            Shape::Ball(s) => s.position,
        }
    }

    pub fn set_position(&mut self, position: Point) {
        match self {
            Shape::Screen(s) => s.position = position,
            Shape::Circle(s) => s.position = position,
            Shape::Rectangle(s) => s.position = position,
            Shape::Ball(s) => s.position = position,
        }
    }

    /// Rotation in degrees, for shapes that support it.
    pub fn rotation(&self) -> Option<f64> {
        match self {
            Shape::Screen(s) => Some(s.rotation),
            Shape::Circle(s) => Some(s.rotation),
            Shape::Rectangle(s) => Some(s.rotation),
            Shape::Ball(_) => None,
        }
    }

    /// Set the rotation. Returns false for shapes without rotation.
    pub fn set_rotation(&mut self, rotation: f64) -> bool {
        match self {
            Shape::Screen(s) => s.rotation = rotation,
            Shape::Circle(s) => s.rotation = rotation,
            Shape::Rectangle(s) => s.rotation = rotation,
            Shape::Ball(_) => return false,
        }
        true
    }

    pub fn is_ball(&self) -> bool {
        matches!(self, Shape::Ball(_))
    }
}

impl BoardElement for Shape {
    fn id(&self) -> &str {
        match self {
            Shape::Screen(s) => &s.id,
            Shape::Circle(s) => &s.id,
            Shape::Rectangle(s) => &s.id,
            Shape::Ball(s) => &s.id,
        }
    }

    fn z_index(&self) -> i64 {
        match self {
            Shape::Screen(s) => s.z_index,
            Shape::Circle(s) => s.z_index,
            Shape::Rectangle(s) => s.z_index,
            Shape::Ball(s) => s.z_index,
        }
    }

    fn set_z_index(&mut self, z_index: i64) {
        match self {
            Shape::Screen(s) => s.z_index = z_index,
            Shape::Circle(s) => s.z_index = z_index,
            Shape::Rectangle(s) => s.z_index = z_index,
            Shape::Ball(s) => s.z_index = z_index,
        }
    }

    fn bounds(&self) -> Option<Rect> {
        Some(match self {
            Shape::Screen(s) => centered_bounds(s.position, s.width, SCREEN_BOUNDS_HEIGHT),
            Shape::Circle(c) => ellipse_bounds(c.position, c.radius_x, c.radius_y),
            Shape::Rectangle(r) => centered_bounds(r.position, r.width, r.height),
            Shape::Ball(b) => ellipse_bounds(b.position, b.radius, b.radius),
        })
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Screen(s) => {
                (point.x - s.position.x).abs() <= s.width / 2.0 + tolerance
                    && (point.y - s.position.y).abs() <= SCREEN_HIT_HEIGHT / 2.0 + tolerance
            }
            Shape::Circle(c) => {
                if c.radius_x <= 0.0 || c.radius_y <= 0.0 {
                    return c.position.distance(point) <= tolerance;
                }
                let dx = (point.x - c.position.x) / c.radius_x;
                let dy = (point.y - c.position.y) / c.radius_y;
                (dx * dx + dy * dy).sqrt() <= CIRCLE_HIT_RATIO
            }
            Shape::Rectangle(r) => {
                (point.x - r.position.x).abs() <= r.width / 2.0 + tolerance
                    && (point.y - r.position.y).abs() <= r.height / 2.0 + tolerance
            }
            Shape::Ball(b) => b.position.distance(point) <= b.radius + tolerance,
        }
    }

    fn translate(&mut self, delta: Vec2) {
        let position = self.position() + delta;
        self.set_position(position);
    }
}
