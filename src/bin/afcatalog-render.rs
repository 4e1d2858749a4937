// Render the filter database JSON as a Markdown reference.

use std::path::PathBuf;

use afcatalog::opts::{DEFAULT_DATABASE_PATH, DEFAULT_MARKDOWN_PATH, RenderOpts};
use afcatalog::{database, logging, markdown};
use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "afcatalog-render")]
#[command(about = "Render the FFmpeg audio filter database as Markdown", long_about = None)]
struct Args {
    /// Database written by afcatalog-extract.
    #[arg(default_value = DEFAULT_DATABASE_PATH)]
    input: PathBuf,

    /// Markdown file to write.
    #[arg(default_value = DEFAULT_MARKDOWN_PATH)]
    output: PathBuf,
}

impl From<Args> for RenderOpts {
    fn from(args: Args) -> Self {
        Self {
            input_path: args.input,
            output_path: args.output,
        }
    }
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opts = RenderOpts::from(Args::parse());

    eprintln!("Reading: {}", opts.input_path.display());
    let db = database::load(&opts.input_path)?;

    eprintln!("Processing {} filters...", db.filters().len());
    markdown::write_file(&opts.output_path, &db)
        .with_context(|| format!("failed to write {}", opts.output_path.display()))?;

    eprintln!("Written: {}", opts.output_path.display());
    eprintln!("Total filters: {}", db.filter_count());
    Ok(())
}
