use super::{configure, open_store};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use maildraft_blocks::BlockType;
use maildraft_editor::{Document, EditSession, TemplateStore};

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Template name (letters, digits, `-`, `_`)
    pub name: String,

    /// Blocks to start with, in order
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "header,text,button,footer"
    )]
    pub blocks: Vec<String>,

    /// Replace an existing template
    #[arg(short, long)]
    pub force: bool,
}

pub fn new(args: NewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut store = open_store(&config, cwd);

    if !args.force && store.list()?.contains(&args.name) {
        return Err(anyhow!(
            "Template {} already exists (use --force to replace it)",
            args.name
        ));
    }

    let block_types = args
        .blocks
        .iter()
        .map(|name| name.trim().parse::<BlockType>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut document = Document::new(&args.name);
    for block_type in &block_types {
        document.add_block(*block_type)?;
    }
    document.select(None)?;

    let session = configure(EditSession::new(args.name.clone(), document), &config, &args.name)?;
    let saved = session.save(&mut store, &args.name)?;

    println!(
        "{} Created {} with {} blocks",
        "✓".green(),
        saved.name.bright_white(),
        block_types.len()
    );
    for block_type in &block_types {
        println!("    {}", block_type.label().dimmed());
    }
    println!("  {}", store.json_path(&args.name)?.display());

    Ok(())
}
