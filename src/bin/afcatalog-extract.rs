// Query an FFmpeg build for its audio filters and write the filter database JSON.

use std::path::PathBuf;

use afcatalog::extract::{self, ExtractObserver};
use afcatalog::logging;
use afcatalog::opts::{DEFAULT_DATABASE_PATH, DEFAULT_FFMPEG_PATH, ExtractOpts};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

#[derive(Parser, Debug)]
#[command(name = "afcatalog-extract")]
#[command(about = "Extract FFmpeg audio filter metadata into a JSON database", long_about = None)]
struct Args {
    /// Where to write the database.
    #[arg(default_value = DEFAULT_DATABASE_PATH)]
    output: PathBuf,

    /// FFmpeg executable to query.
    #[arg(long, env = "AFCATALOG_FFMPEG", default_value = DEFAULT_FFMPEG_PATH)]
    ffmpeg: PathBuf,
}

impl From<Args> for ExtractOpts {
    fn from(args: Args) -> Self {
        Self {
            ffmpeg_path: args.ffmpeg,
            output_path: args.output,
        }
    }
}

/// Prints stage messages and a single overwritten progress line on stderr.
struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    fn new() -> Self {
        eprintln!("Getting FFmpeg version...");
        Self { bar: None }
    }
}

impl ExtractObserver for Progress {
    fn on_version(&mut self, version: &str) {
        eprintln!("FFmpeg version: {version}");
        eprintln!("Scanning audio filters...");
    }

    fn on_filters_listed(&mut self, count: usize) {
        eprintln!("Found {count} audio filters");

        let bar = ProgressBar::with_draw_target(Some(count as u64), ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template("  Processing: {msg:<20} ({pos}/{len})")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        self.bar = Some(bar);
    }

    fn on_filter(&mut self, index: usize, _total: usize, name: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(name.to_owned());
            bar.set_position(index as u64);
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
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
    let opts = ExtractOpts::from(Args::parse());

    let db = {
        let mut progress = Progress::new();
        match extract::run(&opts, &mut progress) {
            Err(afcatalog::Error::NoAudioFilters) => {
                drop(progress);
                eprintln!("ERROR: No audio filters found!");
                eprintln!("Check that FFmpeg is installed at {}", opts.ffmpeg_path.display());
                std::process::exit(1);
            }
            other => other.with_context(|| {
                format!("failed to build filter database at {}", opts.output_path.display())
            })?,
        }
    };

    eprintln!("\nOutput: {}", opts.output_path.display());
    eprintln!("Filters: {}", db.filter_count());
    Ok(())
}
