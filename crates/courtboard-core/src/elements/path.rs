//! Polyline elements: movement, pass, dribble, freehand and arrows.

use super::{BoardElement, ElementId, unassigned_z_index};
use crate::bounds::points_bounds;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Interior freehand points closer than this to the last kept point are dropped.
pub const SIMPLIFY_MIN_DISTANCE: f64 = 2.0;
/// Default stroke width of a path.
pub const DEFAULT_PATH_STROKE: f64 = 3.0;
/// Default arrow head length and width.
pub const DEFAULT_POINTER_SIZE: f64 = 10.0;

/// What a path depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Movement,
    Pass,
    Dribble,
    Freehand,
    Arrow,
}

impl PathKind {
    /// Stroke color used for new paths of this kind.
    pub fn default_color(self) -> &'static str {
        match self {
            PathKind::Pass => "#22c55e",
            PathKind::Dribble => "#f59e0b",
            PathKind::Movement | PathKind::Freehand | PathKind::Arrow => "#ffffff",
        }
    }

    /// Line style used for new paths of this kind.
    pub fn default_line_style(self) -> LineStyle {
        match self {
            PathKind::Pass => LineStyle::Dashed,
            PathKind::Dribble => LineStyle::Zigzag,
            _ => LineStyle::Solid,
        }
    }

    pub(crate) fn id_prefix(self) -> &'static str {
        match self {
            PathKind::Movement => "movement",
            PathKind::Pass => "pass",
            PathKind::Dribble => "dribble",
            PathKind::Freehand => "freehand",
            PathKind::Arrow => "arrow",
        }
    }
}

/// How the renderer strokes a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Zigzag,
}

fn default_stroke_width() -> f64 {
    DEFAULT_PATH_STROKE
}

fn default_pointer_size() -> f64 {
    DEFAULT_POINTER_SIZE
}

/// An ordered list of points. Its position is derived from its bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathElement {
    pub(crate) id: ElementId,
    #[serde(rename = "type")]
    pub kind: PathKind,
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub line_style: LineStyle,
    #[serde(default = "default_pointer_size")]
    pub pointer_length: f64,
    #[serde(default = "default_pointer_size")]
    pub pointer_width: f64,
    #[serde(default = "unassigned_z_index")]
    pub z_index: i64,
}

impl PathElement {
    pub fn new(id: ElementId, kind: PathKind, points: Vec<Point>) -> Self {
        Self {
            id,
            kind,
            points,
            color: kind.default_color().to_string(),
            stroke_width: DEFAULT_PATH_STROKE,
            line_style: kind.default_line_style(),
            pointer_length: DEFAULT_POINTER_SIZE,
            pointer_width: DEFAULT_POINTER_SIZE,
            z_index: 0,
        }
    }
}

impl BoardElement for PathElement {
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
        points_bounds(&self.points)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self.points.as_slice() {
            [] => false,
            [only] => only.distance(point) <= tolerance,
            points => point_to_polyline_dist(point, points) <= tolerance,
        }
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }
}

/// Minimum distance from a point to a line segment.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Thin out a freehand stroke.
///
/// Interior points closer than [`SIMPLIFY_MIN_DISTANCE`] to the last kept
/// point are dropped. The first and last points are always kept.
pub fn simplify_points(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let last_index = points.len() - 1;
    let mut kept = vec![points[0]];
    for p in &points[1..last_index] {
        if kept
            .last()
            .is_some_and(|prev| prev.distance(*p) >= SIMPLIFY_MIN_DISTANCE)
        {
            kept.push(*p);
        }
    }
    kept.push(points[last_index]);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_colors_by_kind() {
        let pass = PathElement::new("p".to_string(), PathKind::Pass, Vec::new());
        assert_eq!(pass.color, "#22c55e");
        assert_eq!(pass.line_style, LineStyle::Dashed);
        let dribble = PathElement::new("d".to_string(), PathKind::Dribble, Vec::new());
        assert_eq!(dribble.color, "#f59e0b");
    }

    #[test]
    fn test_path_kind_is_the_type_tag() {
        let path = PathElement::new(
            "m".to_string(),
            PathKind::Movement,
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        );
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json["type"], "movement");
        assert_eq!(json["points"][1]["x"], 1.0);
    }

    #[test]
    fn test_polyline_hit_test() {
        let path = PathElement::new(
            "m".to_string(),
            PathKind::Movement,
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)],
        );
        assert!(path.hit_test(Point::new(50.0, 10.0), 15.0));
        assert!(path.hit_test(Point::new(110.0, 50.0), 15.0));
        assert!(!path.hit_test(Point::new(50.0, 50.0), 15.0));
    }

    #[test]
    fn test_simplify_drops_close_points() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(1.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.5, 0.0),
        ];
        let simplified = simplify_points(&points);
        assert_eq!(
            simplified,
            vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(3.5, 0.0)]
        );
    }

    #[test]
    fn test_simplify_keeps_short_strokes() {
        let points = vec![Point::new(0.0, 0.0), Point::new(0.1, 0.0)];
        assert_eq!(simplify_points(&points), points);
    }
}
