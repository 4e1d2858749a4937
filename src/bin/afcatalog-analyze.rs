// Print a unit and range analysis of the filter database, optionally exporting a JSON summary.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use afcatalog::opts::{AnalyzeOpts, DEFAULT_DATABASE_PATH};
use afcatalog::{analysis, database, logging, report};
use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "afcatalog-analyze")]
#[command(about = "Analyze units and value ranges of FFmpeg audio filter parameters", long_about = None)]
struct Args {
    /// Database written by afcatalog-extract.
    #[arg(default_value = DEFAULT_DATABASE_PATH)]
    input: PathBuf,

    /// Also write a compact JSON summary here.
    export: Option<PathBuf>,
}

impl From<Args> for AnalyzeOpts {
    fn from(args: Args) -> Self {
        Self {
            input_path: args.input,
            export_path: args.export,
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
    let opts = AnalyzeOpts::from(Args::parse());

    let db = database::load(&opts.input_path)?;
    let analysis = analysis::analyze(&db);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    report::write_report(&mut out, &db, &analysis).context("failed to print report")?;
    out.flush()?;

    if let Some(path) = &opts.export_path {
        report::write_export(path, &analysis)
            .with_context(|| format!("failed to export analysis to {}", path.display()))?;
        eprintln!("\nAnalysis exported to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_is_optional() -> Result<()> {
        let opts = AnalyzeOpts::from(Args::try_parse_from(["afcatalog-analyze"])?);
        assert_eq!(opts.input_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(opts.export_path, None);

        let opts = AnalyzeOpts::from(Args::try_parse_from([
            "afcatalog-analyze",
            "db.json",
            "units.json",
        ])?);
        assert_eq!(opts.export_path, Some(PathBuf::from("units.json")));
        Ok(())
    }
}
