//! Element definitions for the tactics board.

mod annotation;
mod path;
mod player;
mod shape;

pub use annotation::Annotation;
pub use path::{LineStyle, PathElement, PathKind, simplify_points};
pub use player::{PLAYER_RADIUS, Player, Team};
pub use shape::{Ball, Circle, Rectangle, Screen, Shape};

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = String;

/// Marker for elements loaded without a `zIndex`; replaced on import.
pub const Z_INDEX_UNASSIGNED: i64 = i64::MIN;

pub(crate) fn unassigned_z_index() -> i64 {
    Z_INDEX_UNASSIGNED
}

/// The collection an element lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Player,
    Path,
    Shape,
    Annotation,
}

/// Common behaviour of all board elements.
pub trait BoardElement {
    /// Get the unique identifier.
    fn id(&self) -> &str;

    /// Paint/selection order.
    fn z_index(&self) -> i64;

    fn set_z_index(&mut self, z_index: i64);

    /// Axis-aligned bounds, or `None` if the element cannot be bounded.
    fn bounds(&self) -> Option<Rect>;

    /// Check if a point hits this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Move the element by `delta`, preserving its shape.
    fn translate(&mut self, delta: Vec2);
}

/// Generates element ids of the form `prefix_sequence_suffix`.
///
/// The sequence makes ids created by one board strictly increasing; the
/// random suffix keeps them distinct from ids that arrived through import.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    sequence: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a fresh id with the given prefix.
    pub fn next_id(&mut self, prefix: &str) -> ElementId {
        self.sequence += 1;
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}_{}_{}", prefix, self.sequence, &suffix[..8])
    }
}

/// Borrowed view of any element, tagged by variant.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    Player(&'a Player),
    Path(&'a PathElement),
    Shape(&'a Shape),
    Annotation(&'a Annotation),
}

impl<'a> ElementRef<'a> {
    fn element(&self) -> &'a dyn BoardElement {
        match *self {
            ElementRef::Player(p) => p,
            ElementRef::Path(p) => p,
            ElementRef::Shape(s) => s,
            ElementRef::Annotation(a) => a,
        }
    }

    pub fn id(&self) -> &'a str {
        self.element().id()
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementRef::Player(_) => ElementKind::Player,
            ElementRef::Path(_) => ElementKind::Path,
            ElementRef::Shape(_) => ElementKind::Shape,
            ElementRef::Annotation(_) => ElementKind::Annotation,
        }
    }

    pub fn z_index(&self) -> i64 {
        self.element().z_index()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.element().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.element().hit_test(point, tolerance)
    }

    /// Rotation for rotatable variants.
    pub fn rotation(&self) -> Option<f64> {
        match self {
            ElementRef::Shape(s) => s.rotation(),
            _ => None,
        }
    }

    /// Anchor position of point-based variants (`None` for paths).
    pub fn position(&self) -> Option<Point> {
        match self {
            ElementRef::Player(p) => Some(p.position),
            ElementRef::Shape(s) => Some(s.position()),
            ElementRef::Annotation(a) => Some(a.position),
            ElementRef::Path(_) => None,
        }
    }
}

/// Mutable view of any element, tagged by variant.
#[derive(Debug)]
pub enum ElementMut<'a> {
    Player(&'a mut Player),
    Path(&'a mut PathElement),
    Shape(&'a mut Shape),
    Annotation(&'a mut Annotation),
}

impl ElementMut<'_> {
    fn element_mut(&mut self) -> &mut dyn BoardElement {
        match self {
            ElementMut::Player(p) => &mut **p,
            ElementMut::Path(p) => &mut **p,
            ElementMut::Shape(s) => &mut **s,
            ElementMut::Annotation(a) => &mut **a,
        }
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        self.element_mut().set_z_index(z_index);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.element_mut().translate(delta);
    }

    /// Place the element so that its bounds center lands on `center`.
    ///
    /// Centered variants take the coordinates directly. Annotations and
    /// paths are translated by the offset from their current center.
    /// Returns false when the element has no bounds.
    pub fn move_center_to(&mut self, center: Point) -> bool {
        match self {
            ElementMut::Player(p) => {
                p.position = center;
                true
            }
            ElementMut::Shape(s) => {
                s.set_position(center);
                true
            }
            ElementMut::Annotation(_) | ElementMut::Path(_) => {
                let Some(bounds) = self.element_mut().bounds() else {
                    return false;
                };
                self.translate(center - bounds.center());
                true
            }
        }
    }
}
