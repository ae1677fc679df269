//! # Document Mutations
//!
//! Every change to an email document is expressed as a [`Mutation`]
//! command. Commands are validated against the current block sequence
//! before anything is touched, so a rejected command leaves the document
//! exactly as it was.
//!
//! ## Mutation Semantics
//!
//! ### UpdateContent / UpdateSettings
//! - Shallow merge: keys present in the patch overwrite, the rest stay
//! - `columns` and `links` are replaced as whole arrays
//! - The patch variant must match the block variant
//!
//! ### MoveBlock
//! - Array splice: remove at `from`, insert at `to` in the remaining sequence
//! - `from == to` is a no-op
//!
//! ### DeleteBlock
//! - Always clears the selection, whichever block was selected

use maildraft_blocks::{Block, BlockError, BlockId, BlockType, ContentPatch, SettingsPatch};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic document commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Append a block with registry defaults and select it
    AddBlock { block_type: BlockType },

    /// Merge a partial content update into a block
    UpdateContent { block_id: BlockId, patch: ContentPatch },

    /// Merge a partial settings update into a block
    UpdateSettings { block_id: BlockId, patch: SettingsPatch },

    /// Remove a block
    DeleteBlock { block_id: BlockId },

    /// Relocate the block at `from` to `to`
    MoveBlock { from: usize, to: usize },

    /// Change (or clear) the selection
    SelectBlock { block_id: Option<BlockId> },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Index {index} out of range for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Cannot apply {patch} update to {block} block {block_id}")]
    KindMismatch {
        block_id: String,
        block: BlockType,
        patch: BlockType,
    },

    #[error("Duplicate block id: {0}")]
    DuplicateId(String),

    #[error("No drag gesture in progress")]
    NotDragging,

    #[error("Invalid update for block {block_id}: {reason}")]
    InvalidPatch { block_id: String, reason: String },
}

/// Outcome of an applied mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Document version after the mutation
    pub version: u64,

    /// Block created by `AddBlock`
    pub created: Option<BlockId>,

    /// False when the command was a no-op
    pub changed: bool,
}

impl Mutation {
    /// Check the command against the current blocks without applying it
    pub fn validate(&self, blocks: &[Block]) -> Result<(), MutationError> {
        match self {
            Mutation::AddBlock { .. } => Ok(()),

            Mutation::UpdateContent { block_id, patch } => {
                let block = find_block(blocks, block_id)?;
                check_kind(block, patch.block_type())
            }

            Mutation::UpdateSettings { block_id, patch } => {
                let block = find_block(blocks, block_id)?;
                check_kind(block, patch.block_type())
            }

            Mutation::DeleteBlock { block_id } => find_block(blocks, block_id).map(|_| ()),

            Mutation::MoveBlock { from, to } => {
                check_index(*from, blocks.len())?;
                check_index(*to, blocks.len())
            }

            Mutation::SelectBlock { block_id } => match block_id {
                Some(block_id) => find_block(blocks, block_id).map(|_| ()),
                None => Ok(()),
            },
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "add_block",
            Mutation::UpdateContent { .. } => "update_content",
            Mutation::UpdateSettings { .. } => "update_settings",
            Mutation::DeleteBlock { .. } => "delete_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::SelectBlock { .. } => "select_block",
        }
    }
}

pub(crate) fn position(blocks: &[Block], block_id: &str) -> Result<usize, MutationError> {
    blocks
        .iter()
        .position(|b| b.id() == block_id)
        .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))
}

fn find_block<'a>(blocks: &'a [Block], block_id: &str) -> Result<&'a Block, MutationError> {
    position(blocks, block_id).map(|i| &blocks[i])
}

fn check_kind(block: &Block, patch: BlockType) -> Result<(), MutationError> {
    if block.block_type() != patch {
        return Err(MutationError::KindMismatch {
            block_id: block.id().to_string(),
            block: block.block_type(),
            patch,
        });
    }
    Ok(())
}

/// Map a patch failure onto the command error space
pub(crate) fn patch_error(block_id: &str, error: BlockError) -> MutationError {
    match error {
        BlockError::PatchMismatch { block, patch } => MutationError::KindMismatch {
            block_id: block_id.to_string(),
            block,
            patch,
        },
        other => MutationError::InvalidPatch {
            block_id: block_id.to_string(),
            reason: other.to_string(),
        },
    }
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), MutationError> {
    if index >= len {
        return Err(MutationError::IndexOutOfRange { index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maildraft_blocks::{create_block, TextSettingsPatch};

    #[test]
    fn test_validate_rejects_wrong_patch_kind() {
        let blocks = vec![create_block("h1", BlockType::Header)];
        let mutation = Mutation::UpdateSettings {
            block_id: "h1".to_string(),
            patch: SettingsPatch::Text(TextSettingsPatch::default()),
        };

        assert_eq!(
            mutation.validate(&blocks),
            Err(MutationError::KindMismatch {
                block_id: "h1".to_string(),
                block: BlockType::Header,
                patch: BlockType::Text,
            })
        );
    }

    #[test]
    fn test_validate_move_bounds() {
        let blocks = vec![create_block("a", BlockType::Text), create_block("b", BlockType::Text)];

        assert!(Mutation::MoveBlock { from: 1, to: 0 }.validate(&blocks).is_ok());
        assert_eq!(
            Mutation::MoveBlock { from: 0, to: 2 }.validate(&blocks),
            Err(MutationError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::MoveBlock { from: 0, to: 2 };
        let json = serde_json::to_string(&mutation).unwrap();
        assert_eq!(json, r#"{"MoveBlock":{"from":0,"to":2}}"#);

        let back: Mutation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mutation);
    }
}
