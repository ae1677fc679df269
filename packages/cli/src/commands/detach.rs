use super::{open_session, open_store};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use maildraft_editor::EditorMode;
use std::io::{self, BufRead, Write};

#[derive(Debug, Args)]
pub struct DetachArgs {
    /// Template to convert to freeform HTML
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Replace a template's blocks with its compiled markup
pub fn detach(args: DetachArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut store = open_store(&config, cwd);
    let mut session = open_session(&config, &store, &args.name)?;

    if session.mode() == EditorMode::Freeform {
        println!("{} {} is already freeform", "⚠️".yellow(), args.name);
        return Ok(());
    }

    if !args.yes && !confirm(&args.name)? {
        println!("Aborted");
        return Ok(());
    }

    session.switch_to_freeform();
    session.save(&mut store, &args.name)?;

    println!(
        "{} {} is now freeform HTML; its blocks were dropped",
        "✓".green(),
        args.name.bright_white()
    );
    Ok(())
}

fn confirm(name: &str) -> Result<bool> {
    print!(
        "Detaching {} keeps only its HTML. Blocks cannot be restored. Continue? [y/N] ",
        name
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
