use super::{open_session, open_store};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use maildraft_editor::TemplateStore;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Template to compile (defaults to every template)
    pub name: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = open_store(&config, cwd);

    let names = match &args.name {
        Some(name) => vec![name.clone()],
        None => store.list()?,
    };

    if !args.stdout {
        println!("{}", "🔨 Compiling email templates...".bright_blue().bold());
    }

    if names.is_empty() {
        println!("{}", "⚠️  No templates found".yellow());
        return Ok(());
    }

    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for name in &names {
        match compile_template(&config, &store, name, &args, &out_dir) {
            Ok(output_path) => {
                success_count += 1;
                if !args.stdout {
                    println!("  {} {} → {}", "✓".green(), name, output_path);
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {} - {}", "✗".red(), name, format!("{:#}", e).red());
            }
        }
    }

    if args.stdout {
        return Ok(());
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Compiled {} templates successfully",
            "✅".green(),
            success_count
        );
    } else {
        println!(
            "{} Compiled {} templates, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
    }

    Ok(())
}

fn compile_template(
    config: &Config,
    store: &maildraft_editor::FileTemplateStore,
    name: &str,
    args: &CompileArgs,
    out_dir: &std::path::Path,
) -> Result<String> {
    let session = open_session(config, store, name)?;
    let exported = session.export();

    if args.stdout {
        println!("{}", exported.html);
        return Ok("stdout".to_string());
    }

    fs::create_dir_all(out_dir)?;
    let output_file = out_dir.join(&exported.file_name);
    fs::write(&output_file, exported.html)
        .with_context(|| format!("Failed to write {}", output_file.display()))?;

    Ok(output_file.display().to_string())
}
