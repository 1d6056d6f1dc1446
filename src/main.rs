use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use declorder::{
    cleanup::{CleanUpManager, Document},
    config::ReorganizeConfig,
    file_handler::FileHandler,
    parser::TypeScriptSource,
};

#[derive(Parser)]
#[command(name = "declorder")]
#[command(author = "krokorok")]
#[command(version)]
#[command(about = "Reorders class and interface members into a canonical declaration order", long_about = None)]
struct Cli {
    #[arg(help = "Files, directories or glob patterns to reorganize")]
    paths: Vec<PathBuf>,

    #[arg(short, long, help = "Check if files are organized without modifying them")]
    check: bool,

    #[arg(long, help = "Print reorganized output to stdout instead of writing to file")]
    stdout: bool,

    #[arg(long, help = "Skip creating backups of original files")]
    no_backup: bool,

    #[arg(long, help = "Order members of equal rank by name")]
    sort_by_name: bool,

    #[arg(
        long,
        value_name = "OFFSET",
        requires = "stdout",
        help = "Byte offset of the editor cursor; its new position is printed to stderr"
    )]
    cursor: Option<usize>,

    #[arg(short, long, help = "Log every relocation")]
    verbose: bool,
}

/// Outcome of one file.
struct Processed {
    changed: bool,
    cursor: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.paths.is_empty() {
        eprintln!("{}", "Error: No files or directories specified".red());
        std::process::exit(1);
    }

    let file_handler = FileHandler::new(!cli.no_backup);
    let files = file_handler.find_source_files(&cli.paths)?;

    if files.is_empty() {
        println!("{}", "No TypeScript or JavaScript files found".yellow());
        return Ok(());
    }
    if cli.cursor.is_some() && files.len() != 1 {
        bail!("--cursor needs exactly one input file, got {}", files.len());
    }

    let config = ReorganizeConfig::default().with_secondary_order_by_name(cli.sort_by_name);
    let quiet = cli.stdout;
    if !quiet {
        println!("{} {} files", "Reorganizing".green(), files.len());
    }

    let results: Vec<_> = files
        .par_iter()
        .map(|file| process_file(&file_handler, file, &cli, &config))
        .collect();

    let mut had_changes = false;
    let mut had_errors = false;

    for (file, result) in files.iter().zip(results.iter()) {
        match result {
            Ok(processed) => {
                if cli.cursor.is_some() {
                    eprintln!("cursor {}", processed.cursor);
                }
                if quiet {
                    had_changes |= processed.changed;
                    continue;
                }
                if processed.changed {
                    had_changes = true;
                    if cli.check {
                        println!("{} {}", "✗".red(), file.display());
                    } else {
                        println!("{} {}", "✓".green(), file.display());
                    }
                } else {
                    println!("{} {} (no changes)", "✓".green(), file.display());
                }
            }
            Err(e) => {
                had_errors = true;
                eprintln!("{} {}: {:#}", "✗".red(), file.display(), e);
            }
        }
    }

    if cli.check && had_changes {
        eprintln!("\n{}", "Some files are not organized".red());
        std::process::exit(1);
    }

    if had_errors {
        eprintln!("\n{}", "Some files had errors".red());
        std::process::exit(1);
    }

    if !quiet {
        println!("\n{}", "All files organized successfully".green());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "declorder=debug" } else { "declorder=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn process_file(file_handler: &FileHandler, path: &Path, cli: &Cli, config: &ReorganizeConfig) -> Result<Processed> {
    let mut document = Document::open(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let content = document.text().to_string();
    if let Some(cursor) = cli.cursor {
        document = document.with_cursor(cursor)?;
    }

    let source = TypeScriptSource::new();
    let manager = CleanUpManager::new(&source, config.clone());
    let report = manager
        .execute(&mut document)
        .context("Failed to reorganize file")?;
    if let Some(err) = report.errors.first() {
        bail!("{err}");
    }

    let changed = document.text() != content;
    let cursor = document.cursor();

    if cli.stdout {
        print!("{}", document.text());
    } else if changed && !cli.check {
        file_handler.write_file(path, document.text())?;
    }

    Ok(Processed { changed, cursor })
}
