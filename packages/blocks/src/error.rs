use crate::block::BlockType;
use thiserror::Error;

pub type BlockResult<T> = Result<T, BlockError>;

#[derive(Error, Debug)]
pub enum BlockError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Block content is {content} but settings are {settings}")]
    ContentMismatch {
        content: BlockType,
        settings: BlockType,
    },

    #[error("Cannot apply a {patch} patch to a {block} block")]
    PatchMismatch { block: BlockType, patch: BlockType },

    #[error("Invalid {block_type} {field}: {source}")]
    InvalidShape {
        block_type: BlockType,
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Columns block needs {column_count} columns, got {len}")]
    ColumnCount { len: usize, column_count: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BlockError {
    pub fn invalid_shape(block_type: BlockType, field: &'static str, source: serde_json::Error) -> Self {
        Self::InvalidShape {
            block_type,
            field,
            source,
        }
    }
}
