//! The board model: court settings, element collections, selection and tools.

use std::cmp::Reverse;
use std::collections::HashSet;

use kurbo::{Point, Vec2};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::{BoardConfig, DEFAULT_COURT_COLOR, DEFAULT_COURT_HEIGHT, DEFAULT_COURT_WIDTH};
use crate::elements::{
    Annotation, Ball, BoardElement, Circle, ElementId, ElementKind, ElementMut, ElementRef,
    IdGenerator, PathElement, PathKind, Player, Rectangle, Screen, Shape, Team,
    Z_INDEX_UNASSIGNED,
};
use crate::selection::Selection;
use crate::snap::GridSettings;
use crate::tools::{ToolKind, ToolManager};

/// Version tag written by [`Board::export_data`].
pub const BOARD_FORMAT_VERSION: &str = "1.3";
/// Default hit-test tolerance in board units.
pub const DEFAULT_HIT_TOLERANCE: f64 = 15.0;
/// Half the length of a newly placed arrow.
const ARROW_HALF_LENGTH: f64 = 30.0;

/// Court layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtType {
    /// Half court with the basket on the right.
    #[default]
    HalfHorizontal,
    /// Half court with the basket at the bottom.
    HalfVertical,
    Full,
}

impl CourtType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "half_horizontal" => Some(CourtType::HalfHorizontal),
            "half_vertical" => Some(CourtType::HalfVertical),
            "full" => Some(CourtType::Full),
            _ => None,
        }
    }
}

fn lenient_court_type<'de, D>(deserializer: D) -> Result<CourtType, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(match name.as_deref() {
        None => CourtType::default(),
        Some(name) => CourtType::from_name(name).unwrap_or_else(|| {
            log::warn!("Unknown court type '{}', using default", name);
            CourtType::default()
        }),
    })
}

/// Court configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourtSettings {
    #[serde(rename = "type", deserialize_with = "lenient_court_type")]
    pub court_type: CourtType,
    pub background_color: String,
    pub width: f64,
    pub height: f64,
}

impl Default for CourtSettings {
    fn default() -> Self {
        Self {
            court_type: CourtType::default(),
            background_color: DEFAULT_COURT_COLOR.to_string(),
            width: DEFAULT_COURT_WIDTH,
            height: DEFAULT_COURT_HEIGHT,
        }
    }
}

impl CourtSettings {
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Token colors per team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamColors {
    pub offense: String,
    pub defense: String,
}

impl Default for TeamColors {
    fn default() -> Self {
        let config = BoardConfig::default();
        Self {
            offense: config.offense_color,
            defense: config.defense_color,
        }
    }
}

/// The four element collections.
///
/// Deserialization is lenient: entries that fail to decode, duplicate ids
/// and extra balls are dropped with a warning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBoardElements")]
pub struct BoardElements {
    pub players: Vec<Player>,
    pub paths: Vec<PathElement>,
    pub shapes: Vec<Shape>,
    pub annotations: Vec<Annotation>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawBoardElements {
    players: Option<Vec<Value>>,
    paths: Option<Vec<Value>>,
    shapes: Option<Vec<Value>>,
    annotations: Option<Vec<Value>>,
    // Older saves kept these in collections of their own.
    circles: Option<Vec<Value>>,
    rectangles: Option<Vec<Value>>,
    arrows: Option<Vec<Value>>,
    freehand_paths: Option<Vec<Value>>,
    ball: Option<Value>,
}

impl RawBoardElements {
    /// Shapes with the separate circle, rectangle and ball entries folded in.
    fn merged_shapes(&mut self) -> Vec<Value> {
        let mut shapes = self.shapes.take().unwrap_or_default();
        shapes.extend(tag_entries(self.circles.take(), "circle"));
        shapes.extend(tag_entries(self.rectangles.take(), "rectangle"));
        shapes.extend(tag_entries(self.ball.take().map(|ball| vec![ball]), "ball"));
        shapes
    }

    /// Paths with the separate arrow and freehand entries folded in.
    fn merged_paths(&mut self) -> Vec<Value> {
        let mut paths = self.paths.take().unwrap_or_default();
        paths.extend(tag_entries(self.arrows.take(), "arrow"));
        paths.extend(tag_entries(self.freehand_paths.take(), "freehand"));
        paths
    }
}

/// Set the `type` tag of every object entry to `tag`.
fn tag_entries(values: Option<Vec<Value>>, tag: &str) -> Vec<Value> {
    let mut values = values.unwrap_or_default();
    for value in &mut values {
        if let Value::Object(map) = value {
            map.insert("type".to_string(), Value::from(tag));
        }
    }
    values
}

impl From<RawBoardElements> for BoardElements {
    fn from(mut raw: RawBoardElements) -> Self {
        let mut seen = HashSet::new();
        let players: Vec<Player> = decode_collection("players", raw.players.take(), &mut seen);
        let paths: Vec<PathElement> =
            decode_collection("paths", Some(raw.merged_paths()), &mut seen);
        let mut shapes: Vec<Shape> =
            decode_collection("shapes", Some(raw.merged_shapes()), &mut seen);
        let annotations: Vec<Annotation> =
            decode_collection("annotations", raw.annotations.take(), &mut seen);

        let mut has_ball = false;
        shapes.retain(|shape| {
            if !shape.is_ball() {
                return true;
            }
            if has_ball {
                log::warn!("Dropping extra ball '{}'", shape.id());
                return false;
            }
            has_ball = true;
            true
        });

        Self {
            players,
            paths,
            shapes,
            annotations,
        }
    }
}

fn decode_collection<T>(
    collection: &str,
    values: Option<Vec<Value>>,
    seen: &mut HashSet<ElementId>,
) -> Vec<T>
where
    T: DeserializeOwned + BoardElement,
{
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(element) if seen.insert(element.id().to_string()) => Some(element),
            Ok(element) => {
                log::warn!("Dropping duplicate id '{}' in {}", element.id(), collection);
                None
            }
            Err(err) => {
                log::warn!("Dropping undecodable entry in {}: {}", collection, err);
                None
            }
        })
        .collect()
}

/// Exportable state of a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    #[serde(default = "board_format_version")]
    pub version: String,
    #[serde(default)]
    pub court: CourtSettings,
    #[serde(default)]
    pub elements: BoardElements,
    #[serde(default)]
    pub team_colors: TeamColors,
    #[serde(default)]
    pub grid: GridSettings,
}

fn board_format_version() -> String {
    BOARD_FORMAT_VERSION.to_string()
}

impl BoardData {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Options for [`Board::add_player`].
#[derive(Debug, Clone, Default)]
pub struct PlayerOptions {
    /// Defaults to the court center.
    pub position: Option<Point>,
    pub number: String,
    pub label: String,
    pub team: Team,
    pub has_ball: bool,
}

/// The editable diagram.
#[derive(Debug, Clone)]
pub struct Board {
    court: CourtSettings,
    team_colors: TeamColors,
    grid: GridSettings,
    elements: BoardElements,
    selection: Selection,
    tools: ToolManager,
    ids: IdGenerator,
    /// Next z-index handed to a new element.
    next_z: i64,
    /// Incremented on every change to exportable state.
    revision: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with default settings.
    pub fn new() -> Self {
        Self::from_config(&BoardConfig::default())
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            court: CourtSettings {
                court_type: config.court_type,
                background_color: config.background_color.clone(),
                width: config.court_width,
                height: config.court_height,
            },
            team_colors: TeamColors {
                offense: config.offense_color.clone(),
                defense: config.defense_color.clone(),
            },
            grid: GridSettings {
                enabled: false,
                size: config.grid_size,
            },
            elements: BoardElements::default(),
            selection: Selection::new(),
            tools: ToolManager::new(),
            ids: IdGenerator::new(),
            next_z: 0,
            revision: 0,
        }
    }

    /// Create a board from exported data.
    pub fn from_data(data: BoardData) -> Self {
        let mut board = Self::new();
        board.import_data(data);
        board
    }

    /// Change counter for exportable state. Selection and tool changes do
    /// not count.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn take_z(&mut self) -> i64 {
        let z = self.next_z;
        self.next_z = self.next_z.saturating_add(1);
        z
    }

    // --- court, grid, colors ---

    pub fn court(&self) -> &CourtSettings {
        &self.court
    }

    pub fn team_colors(&self) -> &TeamColors {
        &self.team_colors
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    pub fn set_court_type(&mut self, court_type: CourtType) {
        self.court.court_type = court_type;
        self.touch();
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.court.background_color = color.into();
        self.touch();
    }

    pub fn set_court_dimensions(&mut self, width: f64, height: f64) {
        self.court.width = width;
        self.court.height = height;
        self.touch();
    }

    pub fn set_team_color(&mut self, team: Team, color: impl Into<String>) {
        match team {
            Team::Offense => self.team_colors.offense = color.into(),
            Team::Defense => self.team_colors.defense = color.into(),
        }
        self.touch();
    }

    /// Toggle the grid, returning the new state.
    pub fn toggle_grid(&mut self) -> bool {
        self.grid.enabled = !self.grid.enabled;
        self.touch();
        self.grid.enabled
    }

    pub fn set_grid_size(&mut self, size: f64) {
        if size <= 0.0 {
            log::warn!("Ignoring non-positive grid size {}", size);
            return;
        }
        self.grid.size = size;
        self.touch();
    }

    /// Round `value` to the grid when the grid is enabled.
    pub fn snap_to_grid(&self, value: f64) -> f64 {
        self.grid.snap(value)
    }

    // --- element access ---

    pub fn players(&self) -> &[Player] {
        &self.elements.players
    }

    pub fn paths(&self) -> &[PathElement] {
        &self.elements.paths
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.elements.shapes
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.elements.annotations
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.elements.shapes.iter().find_map(|shape| match shape {
            Shape::Ball(ball) => Some(ball),
            _ => None,
        })
    }

    pub fn element_count(&self) -> usize {
        self.elements.players.len()
            + self.elements.paths.len()
            + self.elements.shapes.len()
            + self.elements.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }

    /// All elements in collection order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        let e = &self.elements;
        e.players
            .iter()
            .map(ElementRef::Player)
            .chain(e.paths.iter().map(ElementRef::Path))
            .chain(e.shapes.iter().map(ElementRef::Shape))
            .chain(e.annotations.iter().map(ElementRef::Annotation))
    }

    /// All elements sorted by z-index ascending (paint order).
    pub fn sorted_elements(&self) -> Vec<ElementRef<'_>> {
        let mut all: Vec<_> = self.elements().collect();
        all.sort_by_key(|element| element.z_index());
        all
    }

    pub fn element(&self, id: &str) -> Option<ElementRef<'_>> {
        self.elements().find(|element| element.id() == id)
    }

    pub fn kind_of(&self, id: &str) -> Option<ElementKind> {
        self.selection
            .kind_of(id)
            .or_else(|| self.element(id).map(|element| element.kind()))
    }

    fn element_mut(&mut self, id: &str) -> Option<ElementMut<'_>> {
        let kind = self.kind_of(id)?;
        self.element_mut_of_kind(id, kind)
    }

    fn element_mut_of_kind(&mut self, id: &str, kind: ElementKind) -> Option<ElementMut<'_>> {
        let e = &mut self.elements;
        match kind {
            ElementKind::Player => e
                .players
                .iter_mut()
                .find(|p| p.id == id)
                .map(ElementMut::Player),
            ElementKind::Path => e
                .paths
                .iter_mut()
                .find(|p| p.id == id)
                .map(ElementMut::Path),
            ElementKind::Shape => e
                .shapes
                .iter_mut()
                .find(|s| s.id() == id)
                .map(ElementMut::Shape),
            ElementKind::Annotation => e
                .annotations
                .iter_mut()
                .find(|a| a.id == id)
                .map(ElementMut::Annotation),
        }
    }

    // --- adding elements ---

    /// Add a player and select it.
    pub fn add_player(&mut self, options: PlayerOptions) -> ElementId {
        let id = self.ids.next_id("player");
        let mut player = Player::new(id.clone(), options.position.unwrap_or(self.court.center()));
        player.number = options.number;
        player.label = options.label;
        player.team = options.team;
        player.has_ball = options.has_ball;
        player.z_index = self.take_z();
        self.elements.players.push(player);
        self.finish_add(&id, ElementKind::Player);
        id
    }

    /// Add a screen marker and select it.
    pub fn add_screen(&mut self, position: Option<Point>) -> ElementId {
        let position = position.unwrap_or(self.court.center());
        self.add_shape(|id| Shape::Screen(Screen::new(id, position)), "screen")
    }

    /// Add a circle (radii 30) and select it.
    pub fn add_circle(&mut self, position: Option<Point>) -> ElementId {
        let position = position.unwrap_or(self.court.center());
        self.add_shape(|id| Shape::Circle(Circle::new(id, position, 30.0, 30.0)), "circle")
    }

    /// Add a 60x40 rectangle and select it.
    pub fn add_rectangle(&mut self, position: Option<Point>) -> ElementId {
        let position = position.unwrap_or(self.court.center());
        self.add_shape(
            |id| Shape::Rectangle(Rectangle::new(id, position, 60.0, 40.0)),
            "rect",
        )
    }

    /// Place the ball, replacing any existing one, and select it.
    pub fn add_ball(&mut self, position: Option<Point>) -> ElementId {
        if let Some(old) = self.ball().map(|ball| ball.id.clone()) {
            self.selection.remove(&old);
            self.elements.shapes.retain(|shape| !shape.is_ball());
        }
        let position = position.unwrap_or(self.court.center());
        self.add_shape(|id| Shape::Ball(Ball::new(id, position)), "ball")
    }

    fn add_shape(&mut self, make: impl FnOnce(ElementId) -> Shape, prefix: &str) -> ElementId {
        let id = self.ids.next_id(prefix);
        let mut shape = make(id.clone());
        let z = self.take_z();
        shape.set_z_index(z);
        self.elements.shapes.push(shape);
        self.finish_add(&id, ElementKind::Shape);
        id
    }

    /// Add a text annotation and select it.
    pub fn add_annotation(&mut self, position: Option<Point>, content: Option<String>) -> ElementId {
        let id = self.ids.next_id("annotation");
        let mut annotation = Annotation::new(
            id.clone(),
            position.unwrap_or(self.court.center()),
            content.unwrap_or_else(|| "Text".to_string()),
        );
        annotation.z_index = self.take_z();
        self.elements.annotations.push(annotation);
        self.finish_add(&id, ElementKind::Annotation);
        id
    }

    /// Add a straight arrow centered on `center` and select it.
    pub fn add_arrow(&mut self, center: Option<Point>) -> ElementId {
        let center = center.unwrap_or(self.court.center());
        let offset = Vec2::new(ARROW_HALF_LENGTH, 0.0);
        self.add_path(PathKind::Arrow, vec![center - offset, center + offset])
    }

    /// Add a path with the given points and select it.
    pub fn add_path(&mut self, kind: PathKind, points: Vec<Point>) -> ElementId {
        let id = self.ids.next_id(kind.id_prefix());
        let mut path = PathElement::new(id.clone(), kind, points);
        path.z_index = self.take_z();
        self.elements.paths.push(path);
        self.finish_add(&id, ElementKind::Path);
        id
    }

    fn finish_add(&mut self, id: &str, kind: ElementKind) {
        self.selection.select(id, kind, false);
        self.touch();
        log::debug!("Added {:?} '{}'", kind, id);
    }

    /// Replace all players with five offense and five defense players laid
    /// out for the current court orientation.
    pub fn add_default_players(&mut self) {
        for player in std::mem::take(&mut self.elements.players) {
            self.selection.remove(&player.id);
        }

        let (w, h) = (self.court.width, self.court.height);
        let (offense, defense): ([(f64, f64); 5], [(f64, f64); 5]) =
            if self.court.court_type == CourtType::HalfHorizontal {
                (
                    [(0.7, 0.5), (0.6, 0.25), (0.6, 0.75), (0.4, 0.3), (0.4, 0.7)],
                    [(0.65, 0.5), (0.55, 0.25), (0.55, 0.75), (0.35, 0.3), (0.35, 0.7)],
                )
            } else {
                (
                    [(0.5, 0.3), (0.25, 0.4), (0.75, 0.4), (0.3, 0.6), (0.7, 0.6)],
                    [(0.5, 0.35), (0.25, 0.45), (0.75, 0.45), (0.3, 0.65), (0.7, 0.65)],
                )
            };
        let labels = ["PG", "SG", "SF", "PF", "C"];

        for (index, ((fx, fy), label)) in offense.iter().zip(labels).enumerate() {
            let mut player = Player::new(self.ids.next_id("player"), Point::new(w * fx, h * fy));
            player.number = (index + 1).to_string();
            player.label = label.to_string();
            player.has_ball = index == 0;
            player.z_index = self.take_z();
            self.elements.players.push(player);
        }
        for (fx, fy) in defense {
            let mut player = Player::new(self.ids.next_id("player"), Point::new(w * fx, h * fy));
            player.label = "X".to_string();
            player.team = Team::Defense;
            player.z_index = self.take_z();
            self.elements.players.push(player);
        }
        self.touch();
    }

    // --- updating elements ---

    /// Move an element so its bounds center lands on `(x, y)`.
    ///
    /// Paths and annotations are translated as a whole.
    pub fn update_element_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        let moved = self
            .element_mut(id)
            .is_some_and(|mut element| element.move_center_to(Point::new(x, y)));
        if moved {
            self.touch();
        }
        moved
    }

    /// Move an element by `(dx, dy)`.
    pub fn translate_element(&mut self, id: &str, dx: f64, dy: f64) -> bool {
        let Some(mut element) = self.element_mut(id) else {
            return false;
        };
        element.translate(Vec2::new(dx, dy));
        self.touch();
        true
    }

    /// Edit a player in place.
    pub fn update_player(&mut self, id: &str, f: impl FnOnce(&mut Player)) -> bool {
        let Some(player) = self.elements.players.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        f(player);
        self.touch();
        true
    }

    /// Edit a shape in place.
    pub fn update_shape(&mut self, id: &str, f: impl FnOnce(&mut Shape)) -> bool {
        let Some(shape) = self.elements.shapes.iter_mut().find(|s| s.id() == id) else {
            return false;
        };
        f(shape);
        self.touch();
        true
    }

    /// Edit a path in place.
    pub fn update_path(&mut self, id: &str, f: impl FnOnce(&mut PathElement)) -> bool {
        let Some(path) = self.elements.paths.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        f(path);
        self.touch();
        true
    }

    /// Edit an annotation in place.
    pub fn update_annotation(&mut self, id: &str, f: impl FnOnce(&mut Annotation)) -> bool {
        let Some(annotation) = self.elements.annotations.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        f(annotation);
        self.touch();
        true
    }

    pub fn update_path_points(&mut self, id: &str, points: Vec<Point>) -> bool {
        self.update_path(id, |path| path.points = points)
    }

    pub fn update_annotation_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        let content = content.into();
        self.update_annotation(id, |annotation| annotation.content = content)
    }

    /// Set the rotation of a rotatable shape.
    pub fn set_rotation(&mut self, id: &str, rotation: f64) -> bool {
        let Some(shape) = self.elements.shapes.iter_mut().find(|s| s.id() == id) else {
            return false;
        };
        if !shape.set_rotation(rotation) {
            return false;
        }
        self.touch();
        true
    }

    pub fn update_circle_size(&mut self, id: &str, radius_x: f64, radius_y: f64) -> bool {
        let Some(Shape::Circle(circle)) = self.elements.shapes.iter_mut().find(|s| s.id() == id)
        else {
            return false;
        };
        circle.radius_x = radius_x;
        circle.radius_y = radius_y;
        self.touch();
        true
    }

    pub fn update_rectangle_size(&mut self, id: &str, width: f64, height: f64) -> bool {
        let Some(Shape::Rectangle(rect)) = self.elements.shapes.iter_mut().find(|s| s.id() == id)
        else {
            return false;
        };
        rect.width = width;
        rect.height = height;
        self.touch();
        true
    }

    /// Assign a z-index. Used by the layer commands.
    pub(crate) fn set_z_index(&mut self, id: &str, z_index: i64) -> bool {
        let Some(mut element) = self.element_mut(id) else {
            return false;
        };
        element.set_z_index(z_index);
        self.next_z = self.next_z.max(z_index.saturating_add(1));
        self.touch();
        true
    }

    // --- deleting ---

    /// Remove an element from the collection of `kind`.
    pub fn delete_element(&mut self, id: &str, kind: ElementKind) -> bool {
        let e = &mut self.elements;
        let before = match kind {
            ElementKind::Player => e.players.len(),
            ElementKind::Path => e.paths.len(),
            ElementKind::Shape => e.shapes.len(),
            ElementKind::Annotation => e.annotations.len(),
        };
        let after = match kind {
            ElementKind::Player => {
                e.players.retain(|p| p.id != id);
                e.players.len()
            }
            ElementKind::Path => {
                e.paths.retain(|p| p.id != id);
                e.paths.len()
            }
            ElementKind::Shape => {
                e.shapes.retain(|s| s.id() != id);
                e.shapes.len()
            }
            ElementKind::Annotation => {
                e.annotations.retain(|a| a.id != id);
                e.annotations.len()
            }
        };
        if before == after {
            return false;
        }
        self.selection.remove(id);
        self.touch();
        true
    }

    /// Remove an element by id, whatever its kind.
    pub fn delete(&mut self, id: &str) -> bool {
        match self.kind_of(id) {
            Some(kind) => self.delete_element(id, kind),
            None => false,
        }
    }

    /// Remove every selected element. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let selected: Vec<(ElementId, ElementKind)> = self
            .selection
            .iter()
            .map(|(id, kind)| (id.to_string(), kind))
            .collect();
        selected
            .iter()
            .filter(|(id, kind)| self.delete_element(id, *kind))
            .count()
    }

    /// Remove all elements.
    pub fn clear_all(&mut self) {
        self.elements = BoardElements::default();
        self.selection.clear();
        self.tools.cancel();
        self.touch();
    }

    // --- selection ---

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Select an existing element. Without `additive` the previous
    /// selection is replaced.
    pub fn select_element(&mut self, id: &str, kind: ElementKind, additive: bool) -> bool {
        if self.element(id).map(|element| element.kind()) != Some(kind) {
            return false;
        }
        self.selection.select(id, kind, additive);
        true
    }

    /// Toggle membership of an existing element in the selection.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        let Some(kind) = self.element(id).map(|element| element.kind()) else {
            return false;
        };
        self.selection.toggle(id, kind)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all(&mut self) {
        let all: Vec<(ElementId, ElementKind)> = self
            .elements()
            .map(|element| (element.id().to_string(), element.kind()))
            .collect();
        self.selection.clear();
        for (id, kind) in all {
            self.selection.select(&id, kind, true);
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// The selected elements, in selection order.
    pub fn selected_elements(&self) -> Vec<ElementRef<'_>> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.element(id))
            .collect()
    }

    // --- tools and drawing ---

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    /// Begin drawing a path with the current tool.
    pub fn start_drawing(&mut self, point: Point) -> bool {
        self.tools.start_drawing(point)
    }

    pub fn continue_drawing(&mut self, point: Point) -> bool {
        self.tools.continue_drawing(point)
    }

    /// Finish the draft. Drafts with fewer than two points are discarded.
    pub fn finish_drawing(&mut self) -> Option<ElementId> {
        let draft = self.tools.finish_drawing()?;
        Some(self.add_path(draft.kind, draft.points))
    }

    // --- hit testing and erasing ---

    /// The element under `point`.
    ///
    /// Small targets win: ball, players, circles, rectangles, arrows,
    /// freehand strokes, other paths, screens, then annotations. Within a
    /// class the topmost element wins.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<ElementRef<'_>> {
        let mut candidates: Vec<ElementRef<'_>> = self.elements().collect();
        candidates.sort_by_key(|element| (hit_priority(*element), Reverse(element.z_index())));
        candidates
            .into_iter()
            .find(|element| element.hit_test(point, tolerance))
    }

    pub fn start_erasing(&mut self) {
        self.tools.start_erasing();
    }

    /// Erase the element under `point`, at most once per stroke.
    pub fn erase_at(&mut self, point: Point) -> bool {
        if !self.tools.is_erasing() {
            return false;
        }
        let Some((id, kind)) = self
            .element_at(point, DEFAULT_HIT_TOLERANCE)
            .map(|element| (element.id().to_string(), element.kind()))
        else {
            return false;
        };
        self.tools.mark_erased(&id) && self.delete_element(&id, kind)
    }

    pub fn finish_erasing(&mut self) -> usize {
        self.tools.finish_erasing()
    }

    // --- import/export ---

    /// Snapshot of all exportable state.
    pub fn export_data(&self) -> BoardData {
        BoardData {
            version: BOARD_FORMAT_VERSION.to_string(),
            court: self.court.clone(),
            elements: self.elements.clone(),
            team_colors: self.team_colors.clone(),
            grid: self.grid,
        }
    }

    /// Replace all state with `data` and clear the selection.
    ///
    /// Elements without a z-index are placed above all others, in
    /// collection order.
    pub fn import_data(&mut self, data: BoardData) {
        self.court = data.court;
        self.team_colors = data.team_colors;
        self.grid = data.grid;
        self.elements = data.elements;
        self.selection.clear();
        self.tools.cancel();

        let max_z = self
            .elements()
            .map(|element| element.z_index())
            .filter(|z| *z != Z_INDEX_UNASSIGNED)
            .max();
        self.next_z = max_z.map_or(0, |z| z.saturating_add(1));

        let unassigned: Vec<(ElementId, ElementKind)> = self
            .elements()
            .filter(|element| element.z_index() == Z_INDEX_UNASSIGNED)
            .map(|element| (element.id().to_string(), element.kind()))
            .collect();
        for (id, kind) in unassigned {
            let z = self.take_z();
            if let Some(mut element) = self.element_mut_of_kind(&id, kind) {
                element.set_z_index(z);
            }
        }
        self.touch();
        log::debug!("Imported board with {} elements", self.element_count());
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.export_data().to_json()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_data(BoardData::from_json(json)?))
    }
}

fn hit_priority(element: ElementRef<'_>) -> u8 {
    match element {
        ElementRef::Shape(Shape::Ball(_)) => 0,
        ElementRef::Player(_) => 1,
        ElementRef::Shape(Shape::Circle(_)) => 2,
        ElementRef::Shape(Shape::Rectangle(_)) => 3,
        ElementRef::Path(p) if p.kind == PathKind::Arrow => 4,
        ElementRef::Path(p) if p.kind == PathKind::Freehand => 5,
        ElementRef::Path(_) => 6,
        ElementRef::Shape(Shape::Screen(_)) => 7,
        ElementRef::Annotation(_) => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn player_at(board: &mut Board, x: f64, y: f64) -> ElementId {
        board.add_player(PlayerOptions {
            position: Some(Point::new(x, y)),
            ..Default::default()
        })
    }

    #[test]
    fn test_add_player_defaults_to_center_and_selects() {
        let mut board = Board::new();
        let id = board.add_player(PlayerOptions::default());
        let player = &board.players()[0];
        assert_eq!(player.position, Point::new(350.0, 250.0));
        assert!(board.is_selected(&id));
        assert_eq!(board.selected_count(), 1);
    }

    #[test]
    fn test_ids_unique_across_variants() {
        let mut board = Board::new();
        let ids = [
            board.add_player(PlayerOptions::default()),
            board.add_screen(None),
            board.add_annotation(None, None),
            board.add_arrow(None),
            board.add_circle(None),
        ];
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_single_ball() {
        let mut board = Board::new();
        let first = board.add_ball(None);
        let second = board.add_ball(Some(Point::new(10.0, 10.0)));
        assert_ne!(first, second);
        assert_eq!(board.shapes().len(), 1);
        assert_eq!(board.ball().map(|b| b.position), Some(Point::new(10.0, 10.0)));
        assert!(!board.is_selected(&first));
    }

    #[test]
    fn test_update_position_point_based() {
        let mut board = Board::new();
        let id = board.add_rectangle(None);
        assert!(board.update_element_position(&id, 120.0, 80.0));
        let center = board.element(&id).and_then(|e| e.bounds()).unwrap().center();
        assert!((center.x - 120.0).abs() < EPS);
        assert!((center.y - 80.0).abs() < EPS);
    }

    #[test]
    fn test_update_position_path_preserves_shape() {
        let mut board = Board::new();
        let id = board.add_path(
            PathKind::Movement,
            vec![Point::new(0.0, 0.0), Point::new(40.0, 20.0), Point::new(80.0, 0.0)],
        );
        assert!(board.update_element_position(&id, 100.0, 100.0));
        let path = &board.paths()[0];
        assert_eq!(path.points[0], Point::new(60.0, 90.0));
        assert_eq!(path.points[1] - path.points[0], Vec2::new(40.0, 20.0));
    }

    #[test]
    fn test_update_unknown_id() {
        let mut board = Board::new();
        let revision = board.revision();
        assert!(!board.update_element_position("nope", 1.0, 1.0));
        assert_eq!(board.revision(), revision);
    }

    #[test]
    fn test_drawing_protocol() {
        let mut board = Board::new();
        board.set_tool(ToolKind::Dribble);
        board.start_drawing(Point::new(0.0, 0.0));
        board.continue_drawing(Point::new(30.0, 30.0));
        let id = board.finish_drawing().unwrap();
        assert_eq!(board.paths()[0].kind, PathKind::Dribble);
        assert_eq!(board.paths()[0].color, "#f59e0b");
        assert!(board.is_selected(&id));

        board.start_drawing(Point::new(0.0, 0.0));
        assert!(board.finish_drawing().is_none());
        assert_eq!(board.paths().len(), 1);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut board = Board::new();
        let id = player_at(&mut board, 0.0, 0.0);
        assert!(board.delete_element(&id, ElementKind::Player));
        assert!(!board.is_selected(&id));
        assert!(!board.delete_element(&id, ElementKind::Player));
    }

    #[test]
    fn test_delete_wrong_kind_is_noop() {
        let mut board = Board::new();
        let id = player_at(&mut board, 0.0, 0.0);
        assert!(!board.delete_element(&id, ElementKind::Shape));
        assert_eq!(board.players().len(), 1);
    }

    #[test]
    fn test_delete_selected() {
        let mut board = Board::new();
        player_at(&mut board, 0.0, 0.0);
        board.add_screen(None);
        board.add_annotation(None, None);
        board.select_all();
        assert_eq!(board.delete_selected(), 3);
        assert!(board.is_empty());
    }

    #[test]
    fn test_default_players_horizontal() {
        let mut board = Board::new();
        board.add_default_players();
        let players = board.players();
        assert_eq!(players.len(), 10);
        assert_eq!(players[0].label, "PG");
        assert!(players[0].has_ball);
        assert!((players[0].position.x - 490.0).abs() < EPS);
        assert!(players[5..].iter().all(|p| p.team == Team::Defense && p.label == "X"));
    }

    #[test]
    fn test_default_players_vertical() {
        let mut board = Board::new();
        board.set_court_type(CourtType::Full);
        board.add_default_players();
        assert!((board.players()[0].position.y - 150.0).abs() < EPS);
    }

    #[test]
    fn test_element_at_priority() {
        let mut board = Board::new();
        board.add_annotation(Some(Point::new(95.0, 95.0)), Some("Go".to_string()));
        let player = player_at(&mut board, 100.0, 100.0);
        let ball = board.add_ball(Some(Point::new(110.0, 100.0)));

        let hit = board.element_at(Point::new(105.0, 100.0), DEFAULT_HIT_TOLERANCE);
        assert_eq!(hit.map(|e| e.id()), Some(ball.as_str()));
        board.delete(&ball);
        let hit = board.element_at(Point::new(105.0, 100.0), DEFAULT_HIT_TOLERANCE);
        assert_eq!(hit.map(|e| e.id()), Some(player.as_str()));
        assert!(board.element_at(Point::new(600.0, 400.0), DEFAULT_HIT_TOLERANCE).is_none());
    }

    #[test]
    fn test_eraser_stroke() {
        let mut board = Board::new();
        player_at(&mut board, 100.0, 100.0);
        player_at(&mut board, 100.0, 100.0);
        assert!(!board.erase_at(Point::new(100.0, 100.0)));

        board.start_erasing();
        assert!(board.erase_at(Point::new(100.0, 100.0)));
        assert!(board.erase_at(Point::new(100.0, 100.0)));
        assert!(!board.erase_at(Point::new(100.0, 100.0)));
        assert_eq!(board.finish_erasing(), 2);
        assert!(board.players().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let mut board = Board::new();
        board.add_default_players();
        board.add_arrow(None);
        board.add_circle(Some(Point::new(10.0, 10.0)));
        board.add_annotation(None, Some("Box".to_string()));
        board.toggle_grid();

        let json = board.to_json().unwrap();
        let restored = Board::from_json(&json).unwrap();
        assert_eq!(restored.export_data(), board.export_data());
        assert_eq!(restored.selected_count(), 0);
    }

    #[test]
    fn test_import_assigns_missing_z_index() {
        let json = r##"{
            "court": {"type": "half_horizontal", "backgroundColor": "#000000"},
            "elements": {
                "players": [{"id": "a", "x": 1, "y": 1, "zIndex": 4}, {"id": "b", "x": 2, "y": 2}],
                "annotations": [{"id": "c", "x": 0, "y": 0, "content": "hi"}]
            }
        }"##;
        let mut board = Board::from_json(json).unwrap();
        assert_eq!(board.players()[1].z_index, 5);
        assert_eq!(board.annotations()[0].z_index, 6);
        assert!((board.court().width - DEFAULT_COURT_WIDTH).abs() < EPS);

        let id = player_at(&mut board, 0.0, 0.0);
        assert_eq!(board.element(&id).map(|e| e.z_index()), Some(7));
    }

    #[test]
    fn test_import_drops_bad_entries() {
        let json = r#"{
            "court": {"type": "mystery"},
            "elements": {
                "players": [{"id": "a", "x": 1, "y": 1}, {"id": "a", "x": 3, "y": 3}],
                "shapes": [
                    {"type": "hexagon", "id": "h", "x": 0, "y": 0},
                    {"type": "ball", "id": "b1", "x": 0, "y": 0},
                    {"type": "ball", "id": "b2", "x": 5, "y": 5}
                ],
                "paths": null
            }
        }"#;
        let board = Board::from_json(json).unwrap();
        assert_eq!(board.players().len(), 1);
        assert_eq!(board.shapes().len(), 1);
        assert_eq!(board.ball().map(|b| b.id.as_str()), Some("b1"));
        assert_eq!(board.court().court_type, CourtType::HalfHorizontal);
    }

    #[test]
    fn test_import_folds_separate_collections() {
        let json = r#"{
            "version": "1.3",
            "elements": {
                "players": [{"id": "p", "x": 10, "y": 10, "zIndex": 0}],
                "circles": [{"id": "c", "type": "circle", "x": 50, "y": 50, "radiusX": 20, "radiusY": 10, "zIndex": 1}],
                "rectangles": [{"id": "r", "x": 80, "y": 80, "width": 60, "height": 40, "zIndex": 2}],
                "arrows": [{"id": "a", "points": [{"x": 0, "y": 0}, {"x": 60, "y": 0}], "pointerLength": 12, "zIndex": 3}],
                "freehandPaths": [{"id": "f", "type": "freehand", "points": [{"x": 0, "y": 0}, {"x": 5, "y": 5}], "lineStyle": "dotted", "zIndex": 4}],
                "ball": {"id": "b", "type": "ball", "x": 30, "y": 30, "radius": 12, "zIndex": 5}
            }
        }"#;
        let board = Board::from_json(json).unwrap();
        assert_eq!(board.element_count(), 6);
        assert_eq!(board.shapes().len(), 3);
        assert_eq!(board.ball().map(|b| b.id.as_str()), Some("b"));

        let kinds: Vec<PathKind> = board.paths().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PathKind::Arrow, PathKind::Freehand]);
        assert!((board.paths()[0].pointer_length - 12.0).abs() < EPS);
        assert_eq!(board.paths()[1].line_style, crate::elements::LineStyle::Dotted);

        let exported = serde_json::to_value(board.export_data()).unwrap();
        assert!(exported["elements"].get("circles").is_none());
        assert_eq!(exported["elements"]["shapes"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_import_null_ball_is_ignored() {
        let board =
            Board::from_json(r#"{"elements": {"ball": null, "circles": []}}"#).unwrap();
        assert_eq!(board.element_count(), 0);
    }

    #[test]
    fn test_import_survives_extreme_z_index() {
        let json = r#"{
            "elements": {
                "players": [
                    {"id": "a", "x": 1, "y": 1, "zIndex": 9223372036854775807},
                    {"id": "b", "x": 2, "y": 2}
                ]
            }
        }"#;
        let mut board = Board::from_json(json).unwrap();
        assert_eq!(board.players()[1].z_index, i64::MAX);

        let id = player_at(&mut board, 0.0, 0.0);
        assert_eq!(board.element(&id).map(|e| e.z_index()), Some(i64::MAX));
        board.select_element(&id, ElementKind::Player, false);
        assert!(crate::layers::send_to_back(&mut board));
        assert_eq!(board.sorted_elements()[0].id(), id);
    }

    #[test]
    fn test_selection_requires_matching_kind() {
        let mut board = Board::new();
        let id = player_at(&mut board, 0.0, 0.0);
        board.clear_selection();
        assert!(!board.select_element(&id, ElementKind::Path, false));
        assert!(board.select_element(&id, ElementKind::Player, false));
        assert!(!board.toggle_selection(&id));
        assert!(board.selected_elements().is_empty());
    }

    #[test]
    fn test_grid_snapping() {
        let mut board = Board::new();
        assert!((board.snap_to_grid(33.0) - 33.0).abs() < EPS);
        assert!(board.toggle_grid());
        assert!((board.snap_to_grid(33.0) - 40.0).abs() < EPS);
        board.set_grid_size(0.0);
        assert!((board.grid().size - 20.0).abs() < EPS);
    }

    #[test]
    fn test_rotation_updates() {
        let mut board = Board::new();
        let screen = board.add_screen(None);
        let ball = board.add_ball(None);
        assert!(board.set_rotation(&screen, 90.0));
        assert!(!board.set_rotation(&ball, 90.0));
        assert_eq!(board.element(&screen).and_then(|e| e.rotation()), Some(90.0));
    }

    #[test]
    fn test_clear_all() {
        let mut board = Board::new();
        board.add_default_players();
        board.select_all();
        board.clear_all();
        assert!(board.is_empty());
        assert_eq!(board.selected_count(), 0);
    }
}
