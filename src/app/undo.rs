//! Bounded undo/redo history for the rich view.
//!
//! Two kinds of edits are recorded: text replacements mirrored from the
//! editor buffer, and style snapshots taken around formatting commands.
//! The history is cleared whenever the document is replaced or the active
//! tab changes, so an edit always applies to the text it was recorded
//! against.

use std::collections::VecDeque;

use super::document::StyleSnapshot;

/// One reversible edit.
#[derive(Debug, Clone)]
pub enum Edit {
    /// `deleted` was removed at `pos` and `inserted` put in its place.
    Text {
        pos: usize,
        inserted: String,
        deleted: String,
    },
    /// A formatting command changed styles without touching text.
    Restyle {
        before: StyleSnapshot,
        after: StyleSnapshot,
    },
}

pub struct UndoManager {
    undo_stack: VecDeque<Edit>,
    redo_stack: Vec<Edit>,
    limit: usize,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoManager {
    /// Default bound on remembered edits.
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Record a fresh user edit. Discards any redoable edits and the
    /// oldest history past the limit.
    pub fn record(&mut self, edit: Edit) {
        self.redo_stack.clear();
        self.undo_stack.push_back(edit);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Take the most recent edit for undoing. The caller applies its
    /// inverse, then hands it back via [`push_undone`](Self::push_undone).
    pub fn pop_undo(&mut self) -> Option<Edit> {
        self.undo_stack.pop_back()
    }

    pub fn push_undone(&mut self, edit: Edit) {
        self.redo_stack.push(edit);
    }

    /// Take the most recent undone edit for redoing; hand it back via
    /// [`push_redone`](Self::push_redone) once reapplied.
    pub fn pop_redo(&mut self) -> Option<Edit> {
        self.redo_stack.pop()
    }

    pub fn push_redone(&mut self, edit: Edit) {
        self.undo_stack.push_back(edit);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Discard all history (document replaced or tab switched).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(pos: usize, s: &str) -> Edit {
        Edit::Text {
            pos,
            inserted: s.to_string(),
            deleted: String::new(),
        }
    }

    #[test]
    fn test_fresh_manager_has_no_history() {
        let mgr = UndoManager::new();
        assert!(!mgr.can_undo());
        assert!(!mgr.can_redo());
    }

    #[test]
    fn test_undo_on_empty_history_is_none() {
        let mut mgr = UndoManager::new();
        assert!(mgr.pop_undo().is_none());
        assert!(mgr.pop_redo().is_none());
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut mgr = UndoManager::new();
        mgr.record(typed(0, "a"));
        assert!(mgr.can_undo());

        let edit = mgr.pop_undo().unwrap();
        mgr.push_undone(edit);
        assert!(!mgr.can_undo());
        assert!(mgr.can_redo());

        let edit = mgr.pop_redo().unwrap();
        mgr.push_redone(edit);
        assert!(mgr.can_undo());
        assert!(!mgr.can_redo());
    }

    #[test]
    fn test_new_edit_discards_redo() {
        let mut mgr = UndoManager::new();
        mgr.record(typed(0, "a"));
        let edit = mgr.pop_undo().unwrap();
        mgr.push_undone(edit);
        mgr.record(typed(0, "b"));
        assert!(!mgr.can_redo());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut mgr = UndoManager::new();
        for i in 0..UndoManager::DEFAULT_LIMIT + 10 {
            mgr.record(typed(i, "x"));
        }
        let mut undone = 0;
        while let Some(edit) = mgr.pop_undo() {
            mgr.push_undone(edit);
            undone += 1;
        }
        assert_eq!(undone, UndoManager::DEFAULT_LIMIT);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut mgr = UndoManager::new();
        mgr.record(typed(0, "a"));
        let edit = mgr.pop_undo().unwrap();
        mgr.push_undone(edit);
        mgr.record(typed(0, "b"));
        mgr.clear();
        assert!(!mgr.can_undo());
        assert!(!mgr.can_redo());
    }

    #[test]
    fn test_undo_order_is_lifo() {
        let mut mgr = UndoManager::new();
        mgr.record(typed(0, "first"));
        mgr.record(typed(5, "second"));
        match mgr.pop_undo().unwrap() {
            Edit::Text { inserted, .. } => assert_eq!(inserted, "second"),
            _ => panic!("expected text edit"),
        }
    }
}
