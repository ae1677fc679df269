//! Drag gestures as sequences of MoveBlock commands

use maildraft_blocks::{create_block, BlockType};
use maildraft_editor::{Document, DragController, DragState, Mutation};

fn doc_abcd() -> Document {
    let blocks = ["a", "b", "c", "d"]
        .iter()
        .map(|id| create_block(*id, BlockType::Text))
        .collect();
    Document::from_blocks("drag", blocks).unwrap()
}

fn ids(doc: &Document) -> Vec<String> {
    doc.blocks().iter().map(|b| b.id().to_string()).collect()
}

#[test]
fn test_drag_equals_sequential_moves() {
    let mut dragged = doc_abcd();
    let mut drag = DragController::new();

    drag.drag_start(&dragged, 0).unwrap();
    drag.drag_over(&mut dragged, 2).unwrap();
    drag.drag_over(&mut dragged, 1).unwrap();
    let moves = drag.drag_end();

    let mut direct = doc_abcd();
    direct.move_block(0, 2).unwrap();
    direct.move_block(2, 1).unwrap();

    assert_eq!(ids(&dragged), ids(&direct));
    assert_eq!(ids(&dragged), ["b", "a", "c", "d"]);
    assert_eq!(
        moves,
        vec![
            Mutation::MoveBlock { from: 0, to: 2 },
            Mutation::MoveBlock { from: 2, to: 1 },
        ]
    );
}

#[test]
fn test_dragged_block_follows_pointer() {
    let mut doc = doc_abcd();
    let mut drag = DragController::new();

    drag.drag_start(&doc, 3).unwrap();
    for index in [2, 1, 0] {
        drag.drag_over(&mut doc, index).unwrap();
        assert_eq!(doc.blocks()[index].id(), "d");
    }
    drag.drag_end();

    assert_eq!(ids(&doc), ["d", "a", "b", "c"]);
    assert_eq!(drag.state(), DragState::Idle);
}

#[test]
fn test_repeated_hover_over_same_index() {
    let mut doc = doc_abcd();
    let mut drag = DragController::new();

    drag.drag_start(&doc, 0).unwrap();
    assert!(drag.drag_over(&mut doc, 1).unwrap().is_some());
    assert!(drag.drag_over(&mut doc, 1).unwrap().is_none());
    assert!(drag.drag_over(&mut doc, 1).unwrap().is_none());

    assert_eq!(drag.moves().len(), 1);
    assert_eq!(ids(&doc), ["b", "a", "c", "d"]);
}

#[test]
fn test_cancel_keeps_applied_moves_and_stops_tracking() {
    let mut doc = doc_abcd();
    let mut drag = DragController::new();

    drag.drag_start(&doc, 0).unwrap();
    drag.drag_over(&mut doc, 3).unwrap();
    drag.cancel();

    let version = doc.version();
    assert!(drag.drag_over(&mut doc, 0).unwrap().is_none());
    assert_eq!(doc.version(), version);
    assert_eq!(ids(&doc), ["b", "c", "d", "a"]);
    assert!(drag.moves().is_empty());
}

#[test]
fn test_end_without_movement_changes_nothing() {
    let mut doc = doc_abcd();
    let mut drag = DragController::new();

    drag.drag_start(&doc, 2).unwrap();
    drag.drag_over(&mut doc, 2).unwrap();

    assert!(drag.drag_end().is_empty());
    assert_eq!(doc.version(), 0);
}
