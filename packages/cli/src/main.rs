mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    blocks, compile, detach, init, new, preview, BlocksArgs, CompileArgs, DetachArgs, InitArgs, NewArgs,
    PreviewArgs,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Maildraft CLI - block-based email templates
#[derive(Parser, Debug)]
#[command(name = "maildraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Maildraft project
    Init(InitArgs),

    /// Create a template from a list of blocks
    New(NewArgs),

    /// Compile templates to email HTML
    Compile(CompileArgs),

    /// Render the editing canvas of a template
    Preview(PreviewArgs),

    /// Convert a template to freeform HTML
    Detach(DetachArgs),

    /// List available block types
    Blocks(BlocksArgs),
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()
        .context("Cannot get current directory")?
        .display()
        .to_string();
    debug!(command = ?cli.command, cwd = %cwd, "Running command");

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::New(args) => new(args, &cwd),
        Command::Compile(args) => compile(args, &cwd),
        Command::Preview(args) => preview(args, &cwd),
        Command::Detach(args) => detach(args, &cwd),
        Command::Blocks(args) => blocks(args),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
