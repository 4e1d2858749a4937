//! Line grammars for FFmpeg's human-readable output.
//!
//! Everything that knows what `ffmpeg -version`, `ffmpeg -filters` and
//! `ffmpeg -h filter=<name>` print lives here, so format drift between FFmpeg releases is a
//! one-module change.
//!
//! Parsing is permissive: a line that doesn't fit its grammar is noise, never an error. We
//! count such lines so callers can log them, but they never change the result.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Arity, Number, ParameterRecord, SemanticType, Value};

/// Returned by [`parse_version`] when the marker is missing.
pub const UNKNOWN_VERSION: &str = "unknown";

/// `<flags> <name> <io> <description>`, e.g. ` T.C volume            A->A       Change input volume.`
static FILTER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([T.][S.][C.]?)\s+(\w+)\s+(\S+)\s+(.*)").expect("filter line grammar")
});

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ffmpeg version (\S+)").expect("version grammar"));

static IO_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([AN]+)->([AN]+)").expect("io type grammar"));

/// `  <name>  <type>  <flags>  <text>`, e.g. `  volume  <string>  ..F.A....T. set volume ...`
static PARAMETER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+([a-zA-Z_][a-zA-Z0-9_]*)\s+<([^>]+)>\s+([.\w]+)\s+(.*)")
        .expect("parameter line grammar")
});

static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(from\s+(\S+)\s+to\s+(\S+)\)").expect("range grammar"));

static DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(default\s+([^)]+)\)").expect("default grammar"));

static RANGE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(from\s.*").expect("range tail grammar"));

static DEFAULT_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(default\s.*").expect("default tail grammar"));

/// Bound tokens that mean "unbounded" rather than a usable number.
const SENTINELS: &[&str] = &[
    "INF", "inf", "-INF", "-inf", "FLT_MAX", "-FLT_MAX", "DBL_MAX", "-DBL_MAX", "INT_MAX",
    "-INT_MAX", "I64_MAX", "-I64_MAX", "INT_MIN", "I64_MIN",
];

const NULL_MARKERS: &[&str] = &["", "null", "NULL"];

const AUDIO_MARKER: char = 'A';
const DYNAMIC_MARKER: char = 'N';
const AUTOMATABLE_FLAG: char = 'T';
const OPTIONS_HEADER: &str = "AVOptions:";
const LIST_HEADER: &str = "Filters:";

/// Capability columns of a filter-list line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub timeline: bool,
    pub slice_threading: bool,
    pub command: bool,
}

/// One row of `ffmpeg -filters`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterListing {
    pub name: String,
    pub capabilities: Capabilities,
    /// Raw io token such as `A->A`, `AA->A` or `N->A`.
    pub io_type: String,
    pub brief_description: String,
}

impl FilterListing {
    pub fn is_audio(&self) -> bool {
        self.io_type.contains(AUDIO_MARKER)
    }
}

/// Audio filters found in a `-filters` listing.
#[derive(Debug, Clone, Default)]
pub struct FilterList {
    pub filters: Vec<FilterListing>,
    /// Non-header lines that did not fit the filter line grammar.
    pub unmatched_lines: usize,
}

/// What `ffmpeg -h filter=<name>` told us.
#[derive(Debug, Clone, Default)]
pub struct FilterHelp {
    pub description: Option<String>,
    pub parameters: BTreeMap<String, ParameterRecord>,
    /// Non-blank lines of the options table that were not parameter rows. Enumeration
    /// constants land here too.
    pub unmatched_lines: usize,
}

/// Pull the version token out of `ffmpeg -version`, or [`UNKNOWN_VERSION`].
pub fn parse_version(output: &str) -> String {
    VERSION
        .captures(output)
        .map(|c| c[1].to_owned())
        .unwrap_or_else(|| UNKNOWN_VERSION.to_owned())
}

/// Parse `ffmpeg -filters` output, keeping audio filters only.
pub fn parse_filter_list(output: &str) -> FilterList {
    let mut list = FilterList::default();

    for line in output.split('\n') {
        if line.trim().is_empty()
            || line.starts_with(LIST_HEADER)
            || line.chars().take(10).any(|c| c == '=')
        {
            continue;
        }

        match parse_filter_line(line) {
            Some(listing) if listing.is_audio() => list.filters.push(listing),
            Some(_) => {}
            None => list.unmatched_lines += 1,
        }
    }

    list
}

/// Parse one filter-list line of any media type.
pub fn parse_filter_line(line: &str) -> Option<FilterListing> {
    let caps = FILTER_LINE.captures(line)?;
    Some(FilterListing {
        name: caps[2].to_owned(),
        capabilities: parse_capabilities(&caps[1]),
        io_type: caps[3].to_owned(),
        brief_description: caps[4].trim().to_owned(),
    })
}

/// Decode the `T`/`S`/`C` capability triplet; `.` (or a missing third column) means unsupported.
pub fn parse_capabilities(flags: &str) -> Capabilities {
    let mut chars = flags.chars();
    Capabilities {
        timeline: chars.next() == Some('T'),
        slice_threading: chars.next() == Some('S'),
        command: chars.next() == Some('C'),
    }
}

/// Turn an io token like `AA->A` into input/output arity.
///
/// Each side counts its markers, except a side made only of `N`s, which is dynamic. Tokens
/// outside the `[AN]+->[AN]+` grammar (sources, sinks, mixed media) fall back to one in, one out.
pub fn parse_arity(io_type: &str) -> (Arity, Arity) {
    let Some(caps) = IO_TYPE.captures(io_type) else {
        return (Arity::Count(1), Arity::Count(1));
    };
    (side_arity(&caps[1]), side_arity(&caps[2]))
}

fn side_arity(markers: &str) -> Arity {
    if markers.chars().all(|c| c == DYNAMIC_MARKER) {
        Arity::Dynamic
    } else {
        Arity::Count(markers.chars().count() as u32)
    }
}

/// Parse `ffmpeg -h filter=<name>` output.
pub fn parse_filter_help(name: &str, output: &str) -> FilterHelp {
    let mut help = FilterHelp {
        description: parse_help_description(name, output),
        ..FilterHelp::default()
    };

    let mut in_options = false;
    for line in output.split('\n') {
        if line.contains(OPTIONS_HEADER) {
            in_options = true;
            continue;
        }
        if !in_options {
            continue;
        }

        // A non-indented line starts the next section.
        if !line.is_empty() && !line.starts_with(' ') {
            break;
        }

        match parse_parameter_line(line) {
            Some((param_name, param)) => {
                help.parameters.insert(param_name, param);
            }
            None if !line.trim().is_empty() => help.unmatched_lines += 1,
            None => {}
        }
    }

    help
}

/// The first non-blank line after `Filter <name>`.
fn parse_help_description(name: &str, output: &str) -> Option<String> {
    let pattern = format!(r"Filter {}\s*\n\s*(.+)", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(output)?;
    let description = caps[1].trim();
    (!description.is_empty()).then(|| description.to_owned())
}

/// Parse one row of an `AVOptions` table.
pub fn parse_parameter_line(line: &str) -> Option<(String, ParameterRecord)> {
    let caps = PARAMETER_LINE.captures(line)?;
    let native_type = &caps[2];
    let flags = &caps[3];
    let rest = &caps[4];

    let (min, max) = RANGE
        .captures(rest)
        .map(|r| (parse_number(&r[1]), parse_number(&r[2])))
        .unwrap_or((None, None));

    let default = DEFAULT
        .captures(rest)
        .and_then(|d| parse_value(d[1].trim()));

    let description = RANGE_TAIL.replace(rest, "");
    let description = DEFAULT_TAIL.replace(&description, "").trim().to_owned();

    let record = ParameterRecord {
        kind: SemanticType::from_native(native_type),
        native_type: native_type.to_owned(),
        description,
        min,
        max,
        default,
        automatable: flags.contains(AUTOMATABLE_FLAG),
    };

    Some((caps[1].to_owned(), record))
}

/// Parse a numeric token; sentinels and garbage become `None`.
pub fn parse_number(token: &str) -> Option<Number> {
    if SENTINELS.contains(&token) {
        return None;
    }

    if token.contains('.') || token.contains(|c: char| c == 'e' || c == 'E') {
        return token.parse::<f64>().ok().map(Number::Float);
    }

    if let Ok(n) = token.parse::<i64>() {
        return Some(Number::Int(n));
    }
    if let Ok(n) = token.parse::<u64>() {
        return Some(Number::UInt(n));
    }

    // Past both 64-bit ranges only the magnitude survives.
    let digits = token.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(token);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return token.parse::<f64>().ok().map(Number::Float);
    }

    None
}

/// Parse a default token: null markers are `None`, numbers are numbers, anything else is text.
pub fn parse_value(token: &str) -> Option<Value> {
    if NULL_MARKERS.contains(&token) {
        return None;
    }
    Some(match parse_number(token) {
        Some(n) => Value::Number(n),
        None => Value::Text(token.to_owned()),
    })
}
