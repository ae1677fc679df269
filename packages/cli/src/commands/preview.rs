use super::{open_session, open_store};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Template to render
    pub name: String,

    /// Output file (defaults to `<outDir>/<name>.preview.html`)
    #[arg(short, long)]
    pub out: Option<String>,
}

/// Write the editing canvas of a template as a standalone page
pub fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = open_store(&config, cwd);
    let session = open_session(&config, &store, &args.name)?;

    let canvas = session
        .preview()
        .with_context(|| format!("Cannot preview {}", args.name))?;

    let page = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n<title>{} preview</title>\n</head>\n<body style=\"background-color: #f4f4f4; padding: 20px 0;\">\n{}\n</body>\n</html>\n",
        maildraft_common::escape_text(&args.name),
        canvas.to_html()
    );

    let output_file = match &args.out {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config
            .get_out_dir(cwd)
            .join(format!("{}.preview.html", args.name)),
    };
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, page)?;

    println!(
        "{} {} → {}",
        "✓".green(),
        args.name,
        output_file.display()
    );
    Ok(())
}
