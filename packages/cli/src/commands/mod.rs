pub mod blocks;
pub mod compile;
pub mod detach;
pub mod init;
pub mod new;
pub mod preview;

pub use blocks::{blocks, BlocksArgs};
pub use compile::{compile, CompileArgs};
pub use detach::{detach, DetachArgs};
pub use init::{init, InitArgs};
pub use new::{new, NewArgs};
pub use preview::{preview, PreviewArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use maildraft_editor::{EditSession, FileTemplateStore};
use maildraft_preview::Renderer;

/// Template store rooted at the configured templates directory
pub(crate) fn open_store(config: &Config, cwd: &str) -> FileTemplateStore {
    FileTemplateStore::new(config.get_templates_dir(cwd))
}

/// Load a template into a session using the configured renderers
pub(crate) fn open_session(config: &Config, store: &FileTemplateStore, name: &str) -> Result<EditSession> {
    let session = EditSession::load(store, name)
        .with_context(|| format!("Failed to load template {}", name))?;
    configure(session, config, name)
}

pub(crate) fn configure(session: EditSession, config: &Config, name: &str) -> Result<EditSession> {
    let renderer = Renderer::new(config.compiler_options.preview_options());
    Ok(session
        .with_compile_options(config.compiler_options.compile_options(name))?
        .with_renderer(renderer))
}
