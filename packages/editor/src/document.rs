//! # Document Model
//!
//! The ordered block sequence of one email template plus its selection.
//!
//! All changes go through [`Document::apply`]. Each applied mutation
//! produces a new snapshot: the block list lives behind an `Arc` and is
//! copied on write, so a snapshot handed to a listener or a save is never
//! modified afterwards.
//!
//! ## Lifecycle
//!
//! ```text
//! from_blocks → apply(Mutation)* → snapshot
//!                    ↓
//!             ChangeListener
//! ```

use crate::mutations::{check_index, patch_error, position};
use crate::{Mutation, MutationError, MutationResult};
use maildraft_blocks::{create_block, Block, BlockId, BlockIdGenerator, BlockType, ContentPatch, SettingsPatch};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Immutable view of the block sequence at one version
pub type Snapshot = Arc<Vec<Block>>;

/// Receives the full block sequence after every applied mutation
pub trait ChangeListener {
    fn on_change(&mut self, snapshot: &Snapshot);
}

impl<F> ChangeListener for F
where
    F: FnMut(&Snapshot),
{
    fn on_change(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// Editable email document
pub struct Document {
    blocks: Snapshot,

    selected: Option<BlockId>,

    /// Current version number (increments on each applied mutation)
    version: u64,

    ids: BlockIdGenerator,

    listeners: Vec<Box<dyn ChangeListener>>,
}

impl Document {
    /// Empty document; `template_name` seeds the block ids
    pub fn new(template_name: &str) -> Self {
        Self {
            blocks: Arc::new(Vec::new()),
            selected: None,
            version: 0,
            ids: BlockIdGenerator::new(template_name),
            listeners: Vec::new(),
        }
    }

    /// Document from an existing block sequence; ids must be unique
    pub fn from_blocks(template_name: &str, blocks: Vec<Block>) -> Result<Self, MutationError> {
        let mut seen = HashSet::new();
        for block in &blocks {
            if !seen.insert(block.id()) {
                return Err(MutationError::DuplicateId(block.id().to_string()));
            }
        }

        let mut doc = Self::new(template_name);
        doc.blocks = Arc::new(blocks);
        Ok(doc)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Cheap handle to the current sequence
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.blocks)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == block_id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn add_block(&mut self, block_type: BlockType) -> Result<BlockId, MutationError> {
        let result = self.apply(Mutation::AddBlock { block_type })?;
        result
            .created
            .ok_or_else(|| MutationError::BlockNotFound(block_type.to_string()))
    }

    pub fn update_block_content(
        &mut self,
        block_id: &str,
        patch: ContentPatch,
    ) -> Result<MutationResult, MutationError> {
        self.apply(Mutation::UpdateContent {
            block_id: block_id.to_string(),
            patch,
        })
    }

    pub fn update_block_settings(
        &mut self,
        block_id: &str,
        patch: SettingsPatch,
    ) -> Result<MutationResult, MutationError> {
        self.apply(Mutation::UpdateSettings {
            block_id: block_id.to_string(),
            patch,
        })
    }

    pub fn delete_block(&mut self, block_id: &str) -> Result<MutationResult, MutationError> {
        self.apply(Mutation::DeleteBlock {
            block_id: block_id.to_string(),
        })
    }

    pub fn move_block(&mut self, from: usize, to: usize) -> Result<MutationResult, MutationError> {
        self.apply(Mutation::MoveBlock { from, to })
    }

    pub fn select(&mut self, block_id: Option<&str>) -> Result<MutationResult, MutationError> {
        self.apply(Mutation::SelectBlock {
            block_id: block_id.map(str::to_string),
        })
    }

    /// Validate and apply a mutation, then notify listeners
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, MutationError> {
        mutation.validate(&self.blocks)?;

        let mut created = None;
        let changed = match &mutation {
            Mutation::AddBlock { block_type } => {
                let id = self.next_id();
                Arc::make_mut(&mut self.blocks).push(create_block(id.clone(), *block_type));
                self.selected = Some(id.clone());
                created = Some(id);
                true
            }

            Mutation::UpdateContent { block_id, patch } => {
                let index = position(&self.blocks, block_id)?;
                Arc::make_mut(&mut self.blocks)[index]
                    .apply_content_patch(patch)
                    .map_err(|e| patch_error(block_id, e))?;
                true
            }

            Mutation::UpdateSettings { block_id, patch } => {
                let index = position(&self.blocks, block_id)?;
                Arc::make_mut(&mut self.blocks)[index]
                    .apply_settings_patch(patch)
                    .map_err(|e| patch_error(block_id, e))?;
                true
            }

            Mutation::DeleteBlock { block_id } => {
                let index = position(&self.blocks, block_id)?;
                Arc::make_mut(&mut self.blocks).remove(index);
                self.selected = None;
                true
            }

            Mutation::MoveBlock { from, to } => {
                if from == to {
                    false
                } else {
                    let blocks = Arc::make_mut(&mut self.blocks);
                    let block = blocks.remove(*from);
                    blocks.insert(*to, block);
                    true
                }
            }

            Mutation::SelectBlock { block_id } => {
                self.selected = block_id.clone();
                true
            }
        };

        if changed {
            self.version += 1;
            debug!(
                mutation = mutation.name(),
                version = self.version,
                blocks = self.blocks.len(),
                "Applied mutation"
            );
            self.notify();
        }

        Ok(MutationResult {
            version: self.version,
            created,
            changed,
        })
    }

    /// Drop every block and the selection
    ///
    /// The id generator keeps counting, so ids from before the reset are
    /// never handed out again.
    pub fn clear(&mut self) {
        self.blocks = Arc::new(Vec::new());
        self.selected = None;
        self.version += 1;
        debug!(version = self.version, "Cleared document");
        self.notify();
    }

    /// Block at `index`, bounds checked
    pub fn block_at(&self, index: usize) -> Result<&Block, MutationError> {
        check_index(index, self.blocks.len())?;
        Ok(&self.blocks[index])
    }

    fn next_id(&mut self) -> BlockId {
        loop {
            let id = self.ids.new_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        for listener in &mut self.listeners {
            listener.on_change(&snapshot);
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("blocks", &self.blocks)
            .field("selected", &self.selected)
            .field("version", &self.version)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_empty_document() {
        let doc = Document::new("welcome");

        assert_eq!(doc.version(), 0);
        assert!(doc.is_empty());
        assert!(doc.selected().is_none());
    }

    #[test]
    fn test_rejected_mutation_keeps_version() {
        let mut doc = Document::new("welcome");

        let result = doc.delete_block("missing");
        assert_eq!(result, Err(MutationError::BlockNotFound("missing".to_string())));
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_generated_ids_skip_loaded_ones() {
        let mut probe = BlockIdGenerator::new("welcome");
        let taken = probe.new_id();

        let mut doc = Document::from_blocks("welcome", vec![create_block(taken.clone(), BlockType::Text)]).unwrap();
        let id = doc.add_block(BlockType::Text).unwrap();

        assert_ne!(id, taken);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_clear_notifies() {
        let mut doc = Document::new("welcome");
        doc.add_block(BlockType::Header).unwrap();

        let seen = std::rc::Rc::new(std::cell::Cell::new(usize::MAX));
        let sink = seen.clone();
        doc.subscribe(move |snapshot: &Snapshot| sink.set(snapshot.len()));

        doc.clear();
        assert_eq!(seen.get(), 0);
        assert!(doc.selected().is_none());
    }
}
