//! # Drag Reorder
//!
//! Turns a pointer drag gesture over the canvas into a stream of
//! [`Mutation::MoveBlock`] commands. Every hover over another block moves
//! the dragged block there immediately, and the hovered index becomes the
//! new source, so the canvas always shows the final order while dragging.

use crate::mutations::check_index;
use crate::{Document, Mutation, MutationError, MutationResult};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source_index: usize,
    },
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,

    /// Moves emitted during the current gesture
    moves: Vec<Mutation>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Index of the block being dragged
    pub fn source_index(&self) -> Result<usize, MutationError> {
        match self.state {
            DragState::Dragging { source_index } => Ok(source_index),
            DragState::Idle => Err(MutationError::NotDragging),
        }
    }

    /// Commands emitted so far in this gesture
    pub fn moves(&self) -> &[Mutation] {
        &self.moves
    }

    /// Begin dragging the block at `index`; restarts any gesture in progress
    pub fn drag_start(&mut self, doc: &Document, index: usize) -> Result<(), MutationError> {
        check_index(index, doc.len())?;

        self.state = DragState::Dragging { source_index: index };
        self.moves.clear();
        debug!(index, "Drag started");
        Ok(())
    }

    /// Hover over the block at `index`
    ///
    /// Returns `None` when idle or hovering over the source itself.
    pub fn drag_over(
        &mut self,
        doc: &mut Document,
        index: usize,
    ) -> Result<Option<MutationResult>, MutationError> {
        let DragState::Dragging { source_index } = self.state else {
            return Ok(None);
        };
        if index == source_index {
            return Ok(None);
        }

        let mutation = Mutation::MoveBlock {
            from: source_index,
            to: index,
        };
        let result = doc.apply(mutation.clone())?;

        self.moves.push(mutation);
        self.state = DragState::Dragging { source_index: index };
        Ok(Some(result))
    }

    /// Finish the gesture and hand back its moves
    pub fn drag_end(&mut self) -> Vec<Mutation> {
        self.state = DragState::Idle;
        let moves = std::mem::take(&mut self.moves);
        debug!(moves = moves.len(), "Drag ended");
        moves
    }

    /// Abort the gesture; moves already applied stay applied
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
        self.moves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maildraft_blocks::BlockType;

    fn doc_with(n: usize) -> Document {
        let mut doc = Document::new("drag");
        for _ in 0..n {
            doc.add_block(BlockType::Text).unwrap();
        }
        doc
    }

    #[test]
    fn test_start_out_of_range() {
        let doc = doc_with(2);
        let mut drag = DragController::new();

        assert_eq!(
            drag.drag_start(&doc, 2),
            Err(MutationError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_over_while_idle_does_nothing() {
        let mut doc = doc_with(3);
        let version = doc.version();
        let mut drag = DragController::new();

        assert_eq!(drag.drag_over(&mut doc, 1), Ok(None));
        assert_eq!(doc.version(), version);
        assert_eq!(drag.source_index(), Err(MutationError::NotDragging));
    }

    #[test]
    fn test_over_source_is_noop() {
        let mut doc = doc_with(3);
        let mut drag = DragController::new();
        drag.drag_start(&doc, 1).unwrap();

        assert_eq!(drag.drag_over(&mut doc, 1), Ok(None));
        assert!(drag.moves().is_empty());
    }

    #[test]
    fn test_source_follows_hover() {
        let mut doc = doc_with(4);
        let mut drag = DragController::new();
        drag.drag_start(&doc, 0).unwrap();

        drag.drag_over(&mut doc, 2).unwrap();
        assert_eq!(drag.state(), DragState::Dragging { source_index: 2 });

        let moves = drag.drag_end();
        assert_eq!(moves, vec![Mutation::MoveBlock { from: 0, to: 2 }]);
        assert!(!drag.is_dragging());
    }
}
