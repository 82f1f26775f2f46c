//! Player token.

use super::{BoardElement, ElementId, unassigned_z_index};
use crate::bounds::ellipse_bounds;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Radius of a player token.
pub const PLAYER_RADIUS: f64 = 20.0;

/// Side a player belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[default]
    Offense,
    Defense,
}

/// A player token on the court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub(crate) id: ElementId,
    /// Center of the token.
    #[serde(flatten)]
    pub position: Point,
    /// Jersey number shown inside the token.
    #[serde(default)]
    pub number: String,
    /// Position label (PG, SG, ...).
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub team: Team,
    /// Whether the token is drawn holding the ball.
    #[serde(default)]
    pub has_ball: bool,
    #[serde(default = "unassigned_z_index")]
    pub z_index: i64,
}

impl Player {
    /// Create an offense player with no number.
    pub fn new(id: ElementId, position: Point) -> Self {
        Self {
            id,
            position,
            number: String::new(),
            label: String::new(),
            team: Team::Offense,
            has_ball: false,
            z_index: 0,
        }
    }
}

impl BoardElement for Player {
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
        Some(ellipse_bounds(self.position, PLAYER_RADIUS, PLAYER_RADIUS))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.position.distance(point) <= PLAYER_RADIUS + tolerance
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
