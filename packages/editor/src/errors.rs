//! Error types for the editor

use crate::session::EditorMode;
use maildraft_blocks::BlockError;
use maildraft_compiler_html::CompileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Block error: {0}")]
    Block(#[from] BlockError),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Operation requires {expected} mode, session is in {actual} mode")]
    WrongMode {
        expected: EditorMode,
        actual: EditorMode,
    },
}
