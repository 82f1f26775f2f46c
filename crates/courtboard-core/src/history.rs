//! Snapshot-based undo/redo history.

use std::collections::VecDeque;

/// Maximum number of undo states to keep.
pub const MAX_HISTORY_SIZE: usize = 50;

/// Undo/redo stacks of owned snapshots plus the current snapshot.
///
/// Snapshots are stored by value, so mutating the live state after
/// recording never changes what history holds.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo_stack: VecDeque<T>,
    redo_stack: VecDeque<T>,
    current: Option<T>,
    max_size: usize,
    /// Set while an undo/redo result is being applied to the live state.
    applying: bool,
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> History<T> {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }

    /// History keeping at most `max_size` undo steps.
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            current: None,
            max_size,
            applying: false,
        }
    }

    /// Set the current snapshot without touching either stack.
    pub fn initialize_state(&mut self, state: &T) {
        self.current = Some(state.clone());
    }

    /// Record a new state.
    ///
    /// The previous current state moves onto the undo stack and the redo
    /// stack is cleared. Ignored while an undo/redo is being applied.
    pub fn record_state(&mut self, state: &T) {
        if self.applying {
            return;
        }
        if let Some(previous) = self.current.take() {
            push_bounded(&mut self.undo_stack, previous, self.max_size);
        }
        self.current = Some(state.clone());
        self.redo_stack.clear();
    }

    /// Step back. Returns the snapshot to apply, or `None` if there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<T> {
        let previous = self.undo_stack.pop_back()?;
        if let Some(current) = self.current.take() {
            push_bounded(&mut self.redo_stack, current, self.max_size);
        }
        self.current = Some(previous.clone());
        Some(previous)
    }

    /// Step forward. Returns the snapshot to apply, or `None` if there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Option<T> {
        let next = self.redo_stack.pop_back()?;
        if let Some(current) = self.current.take() {
            push_bounded(&mut self.undo_stack, current, self.max_size);
        }
        self.current = Some(next.clone());
        Some(next)
    }

    /// Drop both stacks. The current snapshot is kept.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Mark the start of applying an undo/redo result.
    pub fn begin_apply(&mut self) {
        self.applying = true;
    }

    pub fn end_apply(&mut self) {
        self.applying = false;
    }

    pub fn is_applying(&self) -> bool {
        self.applying
    }
}

fn push_bounded<T>(stack: &mut VecDeque<T>, value: T, max_size: usize) {
    stack.push_back(value);
    while stack.len() > max_size {
        stack.pop_front();
        log::debug!("History full, evicted oldest snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_steps_after_records() {
        let mut history = History::new();
        for n in 0..5 {
            history.record_state(&n);
        }
        assert_eq!(history.undo_len(), 4);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_steps_are_bounded() {
        let mut history = History::with_capacity(3);
        for n in 0..10 {
            history.record_state(&n);
        }
        assert_eq!(history.undo_len(), 3);
        assert_eq!(history.undo(), Some(8));
        assert_eq!(history.undo(), Some(7));
        assert_eq!(history.undo(), Some(6));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_undo_then_redo_restores() {
        let mut history = History::new();
        history.record_state(&vec![1]);
        history.record_state(&vec![1, 2]);

        assert_eq!(history.undo(), Some(vec![1]));
        assert!(history.can_redo());
        assert_eq!(history.redo(), Some(vec![1, 2]));
        assert_eq!(history.current(), Some(&vec![1, 2]));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        history.record_state(&1);
        history.record_state(&2);
        history.undo();
        history.record_state(&3);
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some(1));
    }

    #[test]
    fn test_record_ignored_while_applying() {
        let mut history = History::new();
        history.record_state(&1);
        history.record_state(&2);
        history.undo();

        history.begin_apply();
        history.record_state(&99);
        history.end_apply();

        assert_eq!(history.current(), Some(&1));
        assert!(history.can_redo());
    }

    #[test]
    fn test_initialize_state_leaves_stacks() {
        let mut history = History::new();
        history.initialize_state(&"loaded");
        assert!(!history.can_undo());
        history.record_state(&"edited");
        assert_eq!(history.undo(), Some("loaded"));
    }

    #[test]
    fn test_clear_history() {
        let mut history = History::new();
        history.record_state(&1);
        history.record_state(&2);
        history.clear_history();
        assert!(!history.can_undo());
        assert_eq!(history.current(), Some(&2));
    }
}
