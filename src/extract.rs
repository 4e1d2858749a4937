//! Build a [`FilterDatabase`] by querying an FFmpeg-like tool.
//!
//! The run is strictly sequential: version, filter list, then one help query per audio
//! filter. The only fatal outcome is a listing with no audio filters in it; a tool call that
//! fails is logged and treated as empty output.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::database;
use crate::grammar::{self, FilterHelp, FilterListing, UNKNOWN_VERSION};
use crate::model::{FilterDatabase, FilterRecord};
use crate::opts::ExtractOpts;
use crate::tool::{FfmpegTool, FilterTool};
use crate::{Error, Result};

/// Progress callbacks for an extraction run.
///
/// Every method has a no-op default so callers only implement what they display. `()` is the
/// silent observer.
pub trait ExtractObserver {
    /// The tool's version was resolved (possibly to `"unknown"`).
    fn on_version(&mut self, _version: &str) {}

    /// The filter listing was parsed and `count` audio filters will be queried.
    fn on_filters_listed(&mut self, _count: usize) {}

    /// Filter number `index` (1-based) of `total` has been processed.
    fn on_filter(&mut self, _index: usize, _total: usize, _name: &str) {}
}

impl ExtractObserver for () {}

/// Query FFmpeg at `opts.ffmpeg_path` and write the database to `opts.output_path`.
pub fn run(opts: &ExtractOpts, observer: &mut dyn ExtractObserver) -> Result<FilterDatabase> {
    let tool = FfmpegTool::new(&opts.ffmpeg_path);
    debug!(tool = %tool.path().display(), "querying filter tool");
    let db = extract_database(&tool, generation_timestamp(), observer)?;
    database::save(&opts.output_path, &db)?;
    Ok(db)
}

/// Drive `tool` through version, listing and per-filter help, and assemble the database.
pub fn extract_database<T>(
    tool: &T,
    generated: impl Into<String>,
    observer: &mut dyn ExtractObserver,
) -> Result<FilterDatabase>
where
    T: FilterTool + ?Sized,
{
    let version = match tool.version_output() {
        Ok(text) => grammar::parse_version(&text),
        Err(err) => {
            warn!(error = %err, "version query failed");
            UNKNOWN_VERSION.to_owned()
        }
    };
    observer.on_version(&version);

    let listing_text = tool.filter_list_output().unwrap_or_else(|err| {
        warn!(error = %err, "filter list query failed");
        String::new()
    });
    let list = grammar::parse_filter_list(&listing_text);
    if list.unmatched_lines > 0 {
        debug!(lines = list.unmatched_lines, "skipped unrecognised filter list lines");
    }

    if list.filters.is_empty() {
        return Err(Error::NoAudioFilters);
    }

    let total = list.filters.len();
    observer.on_filters_listed(total);

    let mut filters = BTreeMap::new();
    for (i, listing) in list.filters.iter().enumerate() {
        let help_text = tool.filter_help_output(&listing.name).unwrap_or_else(|err| {
            warn!(filter = %listing.name, error = %err, "help query failed");
            String::new()
        });

        let help = grammar::parse_filter_help(&listing.name, &help_text);
        if help.unmatched_lines > 0 {
            debug!(
                filter = %listing.name,
                lines = help.unmatched_lines,
                "skipped non-parameter option lines"
            );
        }

        filters.insert(listing.name.clone(), build_record(listing, help));
        observer.on_filter(i + 1, total, &listing.name);
    }

    let db = FilterDatabase::new(version, generated, filters);
    info!(
        version = db.ffmpeg_version(),
        filters = db.filter_count(),
        "extraction complete"
    );
    Ok(db)
}

/// Combine a filter-list row with its help output.
///
/// The help description wins; the listing's brief description is the fallback.
pub fn build_record(listing: &FilterListing, help: FilterHelp) -> FilterRecord {
    let (inputs, outputs) = grammar::parse_arity(&listing.io_type);

    FilterRecord {
        description: help
            .description
            .unwrap_or_else(|| listing.brief_description.clone()),
        timeline_support: listing.capabilities.timeline,
        slice_threading: listing.capabilities.slice_threading,
        command_support: listing.capabilities.command,
        inputs,
        outputs,
        parameters: help.parameters,
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn generation_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
