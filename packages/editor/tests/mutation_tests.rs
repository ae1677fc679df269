//! Document model behavior through the public API

use maildraft_blocks::*;
use maildraft_editor::{Document, Mutation, MutationError, Snapshot};
use std::cell::RefCell;
use std::rc::Rc;

fn ids(doc: &Document) -> Vec<String> {
    doc.blocks().iter().map(|b| b.id().to_string()).collect()
}

fn doc_abcd() -> Document {
    let blocks = ["a", "b", "c", "d"]
        .iter()
        .map(|id| create_block(*id, BlockType::Text))
        .collect();
    Document::from_blocks("test", blocks).unwrap()
}

#[test]
fn test_move_block_is_array_splice() {
    let mut doc = doc_abcd();
    doc.move_block(0, 2).unwrap();
    assert_eq!(ids(&doc), ["b", "c", "a", "d"]);

    let mut doc = doc_abcd();
    doc.move_block(3, 0).unwrap();
    assert_eq!(ids(&doc), ["d", "a", "b", "c"]);
}

#[test]
fn test_move_to_same_index_is_noop() {
    let mut doc = doc_abcd();
    let result = doc.move_block(1, 1).unwrap();

    assert!(!result.changed);
    assert_eq!(doc.version(), 0);
    assert_eq!(ids(&doc), ["a", "b", "c", "d"]);
}

#[test]
fn test_move_out_of_range() {
    let mut doc = doc_abcd();

    assert_eq!(
        doc.move_block(4, 0),
        Err(MutationError::IndexOutOfRange { index: 4, len: 4 })
    );
    assert_eq!(ids(&doc), ["a", "b", "c", "d"]);
}

#[test]
fn test_add_blocks_get_distinct_ids_and_last_is_selected() {
    let mut doc = Document::new("weekly");

    let mut created = Vec::new();
    for block_type in BlockType::ALL {
        created.push(doc.add_block(block_type).unwrap());
    }

    let mut unique = created.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), BlockType::ALL.len());

    assert_eq!(doc.selected(), created.last().map(String::as_str));
    assert_eq!(doc.version(), BlockType::ALL.len() as u64);
}

#[test]
fn test_added_block_has_registry_defaults() {
    let mut doc = Document::new("weekly");
    let id = doc.add_block(BlockType::Button).unwrap();

    let block = doc.get(&id).unwrap();
    assert_eq!(block.content(), &default_content(BlockType::Button));
    assert_eq!(block.settings(), &default_settings(BlockType::Button));
}

#[test]
fn test_ids_are_never_reused_after_delete() {
    let mut doc = Document::new("weekly");
    let first = doc.add_block(BlockType::Text).unwrap();
    doc.delete_block(&first).unwrap();

    let second = doc.add_block(BlockType::Text).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_update_content_keeps_sibling_keys() {
    let mut doc = Document::new("weekly");
    let id = doc.add_block(BlockType::Button).unwrap();

    doc.update_block_content(
        &id,
        ContentPatch::Button(ButtonContentPatch {
            url: Some(Some("https://example.com".to_string())),
            ..Default::default()
        }),
    )
    .unwrap();

    let BlockContent::Button(content) = doc.get(&id).unwrap().content() else {
        panic!("expected button content");
    };
    assert_eq!(content.text, "Click Here");
    assert_eq!(content.url.as_deref(), Some("https://example.com"));
}

#[test]
fn test_update_settings_keeps_sibling_keys() {
    let mut doc = Document::new("weekly");
    let id = doc.add_block(BlockType::Header).unwrap();

    doc.update_block_settings(
        &id,
        SettingsPatch::Header(HeaderSettingsPatch {
            padding: Some(48),
            ..Default::default()
        }),
    )
    .unwrap();

    let BlockSettings::Header(settings) = doc.get(&id).unwrap().settings() else {
        panic!("expected header settings");
    };
    assert_eq!(settings.padding, 48);
    assert_eq!(settings.background_color, "#1a1a2e");
    assert_eq!(settings.align, Align::Center);
}

#[test]
fn test_update_with_wrong_variant_is_rejected() {
    let mut doc = Document::new("weekly");
    let id = doc.add_block(BlockType::Divider).unwrap();
    let before = doc.snapshot();

    let result = doc.update_block_content(
        &id,
        ContentPatch::Text(TextContentPatch {
            html: Some("<p>nope</p>".to_string()),
        }),
    );

    assert!(matches!(result, Err(MutationError::KindMismatch { .. })));
    assert_eq!(doc.snapshot(), before);
}

#[test]
fn test_column_count_resizes_columns() {
    let mut doc = Document::new("weekly");
    let id = doc.add_block(BlockType::Columns).unwrap();

    for (requested, expected) in [(3, 3), (0, 2), (9, 3), (2, 2)] {
        doc.update_block_settings(
            &id,
            SettingsPatch::Columns(ColumnsSettingsPatch {
                column_count: Some(requested),
                ..Default::default()
            }),
        )
        .unwrap();

        let block = doc.get(&id).unwrap();
        let (BlockContent::Columns(content), BlockSettings::Columns(settings)) =
            (block.content(), block.settings())
        else {
            panic!("expected columns block");
        };
        assert_eq!(settings.column_count, expected);
        assert_eq!(content.columns.len(), expected as usize);
    }
}

#[test]
fn test_column_content_must_match_count() {
    let mut doc = Document::new("weekly");
    let id = doc.add_block(BlockType::Columns).unwrap();
    let version = doc.version();

    let columns = (1..=4).map(|n| Column::new(format!("<p>{}</p>", n))).collect();
    let result = doc.update_block_content(&id, ContentPatch::Columns(ColumnsContentPatch { columns: Some(columns) }));

    assert!(matches!(result, Err(MutationError::InvalidPatch { ref block_id, .. }) if *block_id == id));
    assert_eq!(doc.version(), version);
    let Some(BlockContent::Columns(content)) = doc.get(&id).map(|b| b.content()) else {
        panic!("expected columns block");
    };
    assert_eq!(content.columns.len(), 2);
}

#[test]
fn test_delete_clears_selection_unconditionally() {
    let mut doc = Document::new("weekly");
    let first = doc.add_block(BlockType::Text).unwrap();
    let second = doc.add_block(BlockType::Text).unwrap();
    assert_eq!(doc.selected(), Some(second.as_str()));

    doc.delete_block(&first).unwrap();

    assert!(doc.selected().is_none());
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_select_unknown_block() {
    let mut doc = doc_abcd();

    assert_eq!(
        doc.select(Some("zzz")),
        Err(MutationError::BlockNotFound("zzz".to_string()))
    );
    doc.select(Some("c")).unwrap();
    assert_eq!(doc.selected_block().map(|b| b.id()), Some("c"));
    doc.select(None).unwrap();
    assert!(doc.selected().is_none());
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let blocks = vec![
        create_block("x", BlockType::Text),
        create_block("x", BlockType::Image),
    ];

    assert_eq!(
        Document::from_blocks("test", blocks).unwrap_err(),
        MutationError::DuplicateId("x".to_string())
    );
}

#[test]
fn test_snapshots_are_never_modified() {
    let mut doc = doc_abcd();
    let before = doc.snapshot();

    doc.move_block(0, 3).unwrap();
    doc.delete_block("b").unwrap();

    let before_ids: Vec<&str> = before.iter().map(|b| b.id()).collect();
    assert_eq!(before_ids, ["a", "b", "c", "d"]);
    assert_eq!(ids(&doc), ["c", "d", "a"]);
}

#[test]
fn test_listener_sees_every_change() {
    let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut doc = Document::new("weekly");
    doc.subscribe(move |snapshot: &Snapshot| sink.borrow_mut().push(snapshot.len()));

    doc.add_block(BlockType::Header).unwrap();
    doc.add_block(BlockType::Text).unwrap();
    let _ = doc.delete_block("missing");
    doc.move_block(0, 0).unwrap();
    doc.move_block(1, 0).unwrap();

    assert_eq!(*seen.borrow(), vec![1, 2, 2]);
}

#[test]
fn test_commands_replay_from_json() {
    let commands = r#"[
        {"AddBlock": {"block_type": "header"}},
        {"AddBlock": {"block_type": "footer"}},
        {"AddBlock": {"block_type": "text"}},
        {"MoveBlock": {"from": 2, "to": 1}}
    ]"#;
    let mutations: Vec<Mutation> = serde_json::from_str(commands).unwrap();

    let mut doc = Document::new("weekly");
    for mutation in mutations {
        doc.apply(mutation).unwrap();
    }

    let types: Vec<BlockType> = doc.blocks().iter().map(|b| b.block_type()).collect();
    assert_eq!(types, [BlockType::Header, BlockType::Text, BlockType::Footer]);
}
