//! Courtboard Core Library
//!
//! Platform-agnostic data model and editing engine for the Courtboard
//! basketball tactics board: elements, board state, undo history, layer
//! ordering, alignment tools and keyframe animation.

pub mod align;
pub mod animation;
pub mod board;
pub mod bounds;
pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod history;
pub mod layers;
pub mod selection;
pub mod snap;
pub mod storage;
pub mod tools;

pub use animation::{AnimationData, AnimationEngine, Easing, Keyframe, PlaybackState, Pose, Timeline};
pub use board::{Board, BoardData, CourtType};
pub use bounds::element_bounds;
pub use config::BoardConfig;
pub use document::PlayDocument;
pub use editor::Editor;
pub use elements::{Annotation, BoardElement, ElementId, ElementKind, ElementRef, PathElement, PathKind, Player, Shape, Team};
pub use history::History;
pub use selection::Selection;
pub use snap::{GRID_SIZE, GridSettings};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use tools::{ToolKind, ToolManager};
