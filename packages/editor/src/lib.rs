//! # Maildraft Editor
//!
//! Editing engine for block-based email templates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: block types, registry, patches      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document + mutations                │
//! │  - Validated Mutation commands              │
//! │  - Copy-on-write snapshots                  │
//! │  - Drag reorder as MoveBlock commands       │
//! │  - Structured / freeform mode bridge        │
//! └─────────────────────────────────────────────┘
//!            ↓                        ↓
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ preview: canvas VDOM │  │ compiler-html: email │
//! └──────────────────────┘  └──────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use maildraft_blocks::BlockType;
//! use maildraft_editor::{Document, EditSession, MemoryTemplateStore};
//!
//! let mut doc = Document::new("weekly");
//! let header = doc.add_block(BlockType::Header)?;
//! doc.add_block(BlockType::Text)?;
//! doc.move_block(1, 0)?;
//!
//! let session = EditSession::new("weekly", doc);
//! let mut store = MemoryTemplateStore::new();
//! session.save(&mut store, "weekly")?;
//! ```

mod document;
mod drag;
mod errors;
mod mutations;
mod session;
mod store;

pub use document::{ChangeListener, Document, Snapshot};
pub use drag::{DragController, DragState};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError, MutationResult};
pub use session::{EditSession, EditorMode, ExportedFile};
pub use store::{FileTemplateStore, MemoryTemplateStore, SavedTemplate, StoreError, TemplateStore};
