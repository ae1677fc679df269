use anyhow::Result;
use clap::Args;
use colored::Colorize;
use maildraft_blocks::{default_settings, BlockType};

#[derive(Debug, Args)]
pub struct BlocksArgs {}

/// Print the block palette
pub fn blocks(_args: BlocksArgs) -> Result<()> {
    println!("{}", "🧱 Available blocks".bright_blue().bold());

    for block_type in BlockType::ALL {
        let settings = default_settings(block_type);
        println!(
            "  {:<8} {:<8} {}",
            block_type.as_str().bright_white(),
            block_type.label(),
            format!("padding {}px", settings.padding()).dimmed()
        );
    }

    Ok(())
}
