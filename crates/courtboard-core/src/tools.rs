//! Tool modes and the drawing/erasing state machine.

use std::collections::HashSet;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::elements::{ElementId, PathKind, simplify_points};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Player,
    Movement,
    Pass,
    Dribble,
    Screen,
    Text,
    Freehand,
    Circle,
    Rectangle,
    Arrow,
    Eraser,
}

impl ToolKind {
    /// The kind of path produced by a free-drawing tool.
    pub fn path_kind(self) -> Option<PathKind> {
        match self {
            ToolKind::Movement => Some(PathKind::Movement),
            ToolKind::Pass => Some(PathKind::Pass),
            ToolKind::Dribble => Some(PathKind::Dribble),
            ToolKind::Freehand => Some(PathKind::Freehand),
            _ => None,
        }
    }

    /// Check if this tool draws a path with press/drag/release.
    pub fn is_drawing_tool(self) -> bool {
        self.path_kind().is_some()
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// Waiting for interaction.
    #[default]
    Idle,
    /// A path draft is being drawn.
    Drawing {
        kind: PathKind,
        points: Vec<Point>,
    },
    /// An eraser stroke is in progress.
    Erasing {
        /// Elements already erased by this stroke.
        erased: HashSet<ElementId>,
    },
}

/// A finished path draft, ready to be added to the board.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedDraft {
    pub kind: PathKind,
    pub points: Vec<Point>,
}

/// Manages the current tool and its state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Any draft in progress is dropped.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if let ToolState::Drawing { points, .. } = &self.state {
            log::debug!("Dropping draft with {} points on tool change", points.len());
        }
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    /// Drop any draft or eraser stroke without changing the tool.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, ToolState::Drawing { .. })
    }

    pub fn is_erasing(&self) -> bool {
        matches!(self.state, ToolState::Erasing { .. })
    }

    /// Points of the draft in progress (empty when idle).
    pub fn draft_points(&self) -> &[Point] {
        match &self.state {
            ToolState::Drawing { points, .. } => points,
            _ => &[],
        }
    }

    /// Begin a path draft with the current tool.
    ///
    /// Returns false if the current tool does not draw paths. Starting while
    /// a draft is already in progress discards the old draft.
    pub fn start_drawing(&mut self, point: Point) -> bool {
        let Some(kind) = self.current_tool.path_kind() else {
            log::debug!("Tool {:?} does not draw paths", self.current_tool);
            return false;
        };
        if self.is_drawing() {
            log::warn!("Restarting path draft while another is in progress");
        }
        self.state = ToolState::Drawing {
            kind,
            points: vec![point],
        };
        true
    }

    /// Append a point to the draft in progress.
    pub fn continue_drawing(&mut self, point: Point) -> bool {
        match &mut self.state {
            ToolState::Drawing { points, .. } => {
                points.push(point);
                true
            }
            _ => false,
        }
    }

    /// End the draft.
    ///
    /// Drafts with fewer than two points are discarded and yield `None`.
    /// Freehand drafts are simplified before being returned.
    pub fn finish_drawing(&mut self) -> Option<FinishedDraft> {
        let ToolState::Drawing { kind, points } = &mut self.state else {
            return None;
        };
        let (kind, points) = (*kind, std::mem::take(points));
        self.state = ToolState::Idle;
        if points.len() < 2 {
            log::debug!("Discarding {:?} draft with {} point(s)", kind, points.len());
            return None;
        }
        let points = if kind == PathKind::Freehand {
            simplify_points(&points)
        } else {
            points
        };
        Some(FinishedDraft { kind, points })
    }

    /// Begin an eraser stroke.
    pub fn start_erasing(&mut self) {
        self.state = ToolState::Erasing {
            erased: HashSet::new(),
        };
    }

    /// Record `id` as erased by the current stroke.
    ///
    /// Returns false when no stroke is active or the element was already
    /// erased by it.
    pub fn mark_erased(&mut self, id: &str) -> bool {
        match &mut self.state {
            ToolState::Erasing { erased } => erased.insert(id.to_string()),
            _ => false,
        }
    }

    /// End the eraser stroke, returning how many elements it erased.
    pub fn finish_erasing(&mut self) -> usize {
        match std::mem::take(&mut self.state) {
            ToolState::Erasing { erased } => erased.len(),
            other => {
                self.state = other;
                0
            }
        }
    }
}
