//! Command-driven update cycle tying the board to its undo history.

use crate::align::{self, Alignment, Axis};
use crate::animation::{AnimationEngine, Easing};
use crate::board::{Board, BoardData};
use crate::config::BoardConfig;
use crate::document::PlayDocument;
use crate::history::History;
use crate::layers;

/// Owns a board, its history and an animation engine.
///
/// Every mutation goes through [`Editor::edit`]; when it changes the
/// board's exportable state, one snapshot is recorded.
#[derive(Debug)]
pub struct Editor {
    board: Board,
    history: History<BoardData>,
    animation: AnimationEngine,
    /// Board revision of the last recorded snapshot.
    recorded_revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::from_config(&BoardConfig::default())
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        let board = Board::from_config(config);
        let mut history = History::with_capacity(config.history_size);
        history.initialize_state(&board.export_data());
        let mut animation = AnimationEngine::new();
        animation.set_default_duration(config.default_duration_ms);
        let recorded_revision = board.revision();
        Self {
            board,
            history,
            animation,
            recorded_revision,
        }
    }

    /// Open a saved document. History starts empty.
    pub fn open(document: PlayDocument) -> Self {
        Self::open_with_config(document, &BoardConfig::default())
    }

    /// Open a saved document with the history size and default animation
    /// duration taken from `config`. The document's own court wins.
    pub fn open_with_config(document: PlayDocument, config: &BoardConfig) -> Self {
        let mut editor = Self::from_config(config);
        editor.load(document.board);
        if let Some(animation) = document.animation {
            editor.animation.import_data(animation);
        }
        editor
    }

    /// Replace the animation engine (e.g. to drive it from a host clock).
    pub fn with_animation(mut self, mut animation: AnimationEngine) -> Self {
        animation.import_data(self.animation.export_data());
        self.animation = animation;
        self
    }

    /// Replace the board with `data` and reset history.
    pub fn load(&mut self, data: BoardData) {
        self.board.import_data(data);
        self.history.clear_history();
        self.history.initialize_state(&self.board.export_data());
        self.recorded_revision = self.board.revision();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &History<BoardData> {
        &self.history
    }

    pub fn animation(&self) -> &AnimationEngine {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut AnimationEngine {
        &mut self.animation
    }

    /// Run a mutation against the board and record it as one undo step if
    /// it changed anything.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Board) -> R) -> R {
        let result = f(&mut self.board);
        self.sync();
        result
    }

    fn sync(&mut self) {
        let revision = self.board.revision();
        if revision == self.recorded_revision {
            return;
        }
        self.history.record_state(&self.board.export_data());
        self.recorded_revision = revision;
    }

    fn apply(&mut self, snapshot: BoardData) {
        self.history.begin_apply();
        self.board.import_data(snapshot);
        self.sync();
        self.history.end_apply();
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.apply(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.apply(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- layers ---

    pub fn bring_to_front(&mut self) -> bool {
        self.edit(layers::bring_to_front)
    }

    pub fn send_to_back(&mut self) -> bool {
        self.edit(layers::send_to_back)
    }

    pub fn bring_forward(&mut self) -> bool {
        self.edit(layers::bring_forward)
    }

    pub fn send_backward(&mut self) -> bool {
        self.edit(layers::send_backward)
    }

    pub fn can_bring_forward(&self) -> bool {
        layers::can_bring_forward(&self.board)
    }

    pub fn can_send_backward(&self) -> bool {
        layers::can_send_backward(&self.board)
    }

    // --- alignment ---

    pub fn align(&mut self, alignment: Alignment) -> bool {
        self.edit(|board| align::align(board, alignment))
    }

    pub fn distribute(&mut self, axis: Axis) -> bool {
        self.edit(|board| align::distribute(board, axis))
    }

    // --- animation ---

    /// Make the current board pose keyframe 0.
    pub fn seed_animation(&mut self) {
        self.animation.seed_from_board(&self.board);
    }

    /// Record the current board pose as a keyframe.
    pub fn capture_keyframe(&mut self, time: f64, easing: Easing) -> usize {
        self.animation.capture_keyframe(time, &self.board, easing)
    }

    /// Save the board and animation as a document.
    pub fn to_document(&self, name: impl Into<String>) -> PlayDocument {
        let animation = (!self.animation.keyframes().is_empty())
            .then(|| self.animation.export_data());
        PlayDocument::new(name, self.board.export_data(), animation)
    }
}
