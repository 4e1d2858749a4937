//! The filter database record types.
//!
//! These mirror the JSON file that connects the three tools: the extractor builds a
//! [`FilterDatabase`] once and writes it out, the renderer and analyzer load it back and only
//! ever read it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A numeric bound or default as FFmpeg printed it.
///
/// We keep integers and floats apart so `1` and `1.0` survive a round trip through JSON and
/// print the way the tool printed them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    /// Unsigned values past `i64::MAX`, such as `uint64` option limits.
    UInt(u64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::UInt(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    /// Whether the value has no fractional part (`2.0` counts as integral).
    pub fn is_integral(self) -> bool {
        match self {
            Number::Int(_) | Number::UInt(_) => true,
            Number::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::UInt(n) => write!(f, "{n}"),
            // Debug keeps the decimal point (`1.0`) and switches to exponent form for
            // very large or very small magnitudes.
            Number::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// A parameter default: a number, free text (enum names, expressions), or a boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Input or output pad count of a filter.
///
/// Stored in JSON as a string: a decimal count or the literal `"dynamic"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Arity {
    Count(u32),
    Dynamic,
}

impl Default for Arity {
    fn default() -> Self {
        Arity::Count(1)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Count(n) => write!(f, "{n}"),
            Arity::Dynamic => f.write_str("dynamic"),
        }
    }
}

impl FromStr for Arity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "dynamic" {
            return Ok(Arity::Dynamic);
        }
        s.parse::<u32>().map(Arity::Count).map_err(|_| {
            Error::msg(format!("invalid arity '{s}': expected a count or \"dynamic\""))
        })
    }
}

impl From<Arity> for String {
    fn from(arity: Arity) -> Self {
        arity.to_string()
    }
}

impl TryFrom<String> for Arity {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// The documentation-level type of a parameter.
///
/// FFmpeg native types we don't recognise pass through unchanged as [`SemanticType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SemanticType {
    Integer,
    Float,
    Boolean,
    String,
    Flags,
    Duration,
    Color,
    Rational,
    SampleFormat,
    PixelFormat,
    ChannelLayout,
    ImageSize,
    VideoRate,
    Other(String),
}

impl SemanticType {
    /// Map an FFmpeg option type tag (the text inside `<...>`) to a semantic type.
    pub fn from_native(native: &str) -> Self {
        match native {
            "int" | "int64" | "uint64" => SemanticType::Integer,
            "float" | "double" => SemanticType::Float,
            "boolean" | "bool" => SemanticType::Boolean,
            "string" => SemanticType::String,
            "flags" => SemanticType::Flags,
            "duration" => SemanticType::Duration,
            "color" => SemanticType::Color,
            "rational" => SemanticType::Rational,
            "sample_fmt" => SemanticType::SampleFormat,
            "pix_fmt" => SemanticType::PixelFormat,
            "channel_layout" => SemanticType::ChannelLayout,
            "image_size" => SemanticType::ImageSize,
            "video_rate" => SemanticType::VideoRate,
            other => SemanticType::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SemanticType::Integer => "integer",
            SemanticType::Float => "float",
            SemanticType::Boolean => "boolean",
            SemanticType::String => "string",
            SemanticType::Flags => "flags",
            SemanticType::Duration => "duration",
            SemanticType::Color => "color",
            SemanticType::Rational => "rational",
            SemanticType::SampleFormat => "sample_format",
            SemanticType::PixelFormat => "pixel_format",
            SemanticType::ChannelLayout => "channel_layout",
            SemanticType::ImageSize => "image_size",
            SemanticType::VideoRate => "video_rate",
            SemanticType::Other(s) => s,
        }
    }
}

impl Default for SemanticType {
    fn default() -> Self {
        SemanticType::Other("unknown".to_owned())
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SemanticType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "integer" => SemanticType::Integer,
            "float" => SemanticType::Float,
            "boolean" => SemanticType::Boolean,
            "string" => SemanticType::String,
            "flags" => SemanticType::Flags,
            "duration" => SemanticType::Duration,
            "color" => SemanticType::Color,
            "rational" => SemanticType::Rational,
            "sample_format" => SemanticType::SampleFormat,
            "pixel_format" => SemanticType::PixelFormat,
            "channel_layout" => SemanticType::ChannelLayout,
            "image_size" => SemanticType::ImageSize,
            "video_rate" => SemanticType::VideoRate,
            _ => SemanticType::Other(s),
        }
    }
}

impl From<SemanticType> for String {
    fn from(t: SemanticType) -> Self {
        match t {
            SemanticType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

/// One option of a filter, as listed in its `AVOptions` table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterRecord {
    #[serde(rename = "type")]
    pub kind: SemanticType,

    /// FFmpeg's own type tag, e.g. `int`, `double`, `sample_fmt`. A file without the key reads
    /// as `unknown`; an empty tag stays empty.
    #[serde(rename = "ffmpeg_type", default = "unknown_native_type")]
    pub native_type: String,

    pub description: String,

    /// `None` when unbounded or printed as a sentinel like `INT_MAX`.
    pub min: Option<Number>,
    pub max: Option<Number>,

    pub default: Option<Value>,

    /// Whether the option can be changed at runtime (the `T` flag).
    pub automatable: bool,
}

fn unknown_native_type() -> String {
    "unknown".to_owned()
}

/// One audio filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRecord {
    pub description: String,
    pub timeline_support: bool,
    pub slice_threading: bool,
    pub command_support: bool,
    pub inputs: Arity,
    pub outputs: Arity,
    pub parameters: BTreeMap<String, ParameterRecord>,
}

impl FilterRecord {
    /// Names of the parameters that can be changed at runtime, in name order.
    pub fn automatable_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|(_, p)| p.automatable)
            .map(|(name, _)| name.as_str())
    }
}

/// A snapshot of every audio filter one FFmpeg build exposes.
///
/// Filters are keyed by name in a `BTreeMap`, so iteration is always lexicographic no matter
/// what order the JSON file listed them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DatabaseFile")]
pub struct FilterDatabase {
    ffmpeg_version: String,
    generated: String,
    filter_count: usize,
    filters: BTreeMap<String, FilterRecord>,
}

impl FilterDatabase {
    /// Build a database; `filter_count` always equals the number of filters.
    pub fn new(
        ffmpeg_version: impl Into<String>,
        generated: impl Into<String>,
        filters: BTreeMap<String, FilterRecord>,
    ) -> Self {
        Self {
            ffmpeg_version: ffmpeg_version.into(),
            generated: generated.into(),
            filter_count: filters.len(),
            filters,
        }
    }

    pub fn ffmpeg_version(&self) -> &str {
        &self.ffmpeg_version
    }

    pub fn generated(&self) -> &str {
        &self.generated
    }

    /// The count recorded in the file. Hand-edited files may disagree with `filters().len()`.
    pub fn filter_count(&self) -> usize {
        self.filter_count
    }

    pub fn filters(&self) -> &BTreeMap<String, FilterRecord> {
        &self.filters
    }
}

/// On-disk shape, tolerant of missing keys.
#[derive(Deserialize)]
struct DatabaseFile {
    #[serde(default = "unknown_version")]
    ffmpeg_version: String,
    #[serde(default)]
    generated: String,
    #[serde(default)]
    filter_count: Option<usize>,
    #[serde(default)]
    filters: BTreeMap<String, FilterRecord>,
}

fn unknown_version() -> String {
    "Unknown".to_owned()
}

impl From<DatabaseFile> for FilterDatabase {
    fn from(file: DatabaseFile) -> Self {
        Self {
            filter_count: file.filter_count.unwrap_or(file.filters.len()),
            ffmpeg_version: file.ffmpeg_version,
            generated: file.generated,
            filters: file.filters,
        }
    }
}
