//! Unit and shape analysis over a [`FilterDatabase`].
//!
//! Four groupings are computed in one pass over every parameter:
//! - by FFmpeg native type
//! - by unit cues found in the description (a parameter can land in several units)
//! - by the shape of its numeric range (first matching rule only)
//! - by the shape of its default value

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{FilterDatabase, Number, Value};

/// Description cues and the unit they suggest, checked in this order.
const UNIT_PATTERNS: &[(&str, &str)] = &[
    (r"\b(\d+)\s*dB\b", "dB"),
    (r"\bdB\b", "dB"),
    (r"\b(\d+)\s*Hz\b", "Hz"),
    (r"\bHz\b", "Hz"),
    (r"\bfrequency\b", "Hz (implied)"),
    (r"\bcutoff\b", "Hz (implied)"),
    (r"\bbandwidth\b", "Hz (implied)"),
    (r"\b(\d+)\s*ms\b", "ms"),
    (r"\bmilliseconds?\b", "ms"),
    (r"\bseconds?\b", "seconds"),
    (r"\bsamples?\b", "samples"),
    (r"\b(\d+)\s*%\b", "percent"),
    (r"\bpercent\b", "percent"),
    (r"\bratio\b", "ratio"),
    (r"\bgain\b", "gain"),
    (r"\blevel\b", "level"),
    (r"\bvolume\b", "volume"),
    (r"\bthreshold\b", "threshold"),
    (r"\battack\b", "time (attack)"),
    (r"\brelease\b", "time (release)"),
    (r"\bdelay\b", "time (delay)"),
    (r"\bduration\b", "time (duration)"),
    (r"\bspeed\b", "speed/rate"),
    (r"\brate\b", "rate"),
    (r"\bdepth\b", "depth"),
    (r"\bmix\b", "mix/blend"),
    (r"\bwet\b", "wet/dry"),
    (r"\bdry\b", "wet/dry"),
    (r"\bwidth\b", "width"),
    (r"\boctave\b", "octaves"),
    (r"\bQ\b", "Q factor"),
    (r"\bslope\b", "slope"),
    (r"\bangle\b", "angle/degrees"),
    (r"\bdegrees?\b", "degrees"),
    (r"\bphase\b", "phase"),
    (r"\bchannels?\b", "channels"),
    (r"\bbits?\b", "bits"),
    (r"\border\b", "order"),
    (r"\bcount\b", "count"),
    (r"\bsize\b", "size"),
    (r"\blength\b", "length"),
];

static UNIT_DETECTORS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    UNIT_PATTERNS
        .iter()
        .map(|(pattern, unit)| {
            let re = Regex::new(&format!("(?i){pattern}")).expect("unit detector pattern");
            (re, *unit)
        })
        .collect()
});

static MENTIONS_DB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdB\b").expect("dB cue"));

static NUMERIC_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+\.?\d*$").expect("numeric string pattern"));

/// Upper bounds that mark a parameter as spanning the audible band.
const AUDIO_FREQUENCY_LIMITS: &[f64] = &[20000.0, 22050.0, 24000.0];

/// Length of the description excerpt kept with each unit hit.
const SNIPPET_CHARS: usize = 60;

/// Inputs to a range-shape rule.
#[derive(Debug, Clone, Copy)]
pub struct RangeSample<'a> {
    pub min: Number,
    pub max: Number,
    /// Lower-cased parameter description.
    pub description: &'a str,
}

impl RangeSample<'_> {
    fn spans(&self, lo: f64, hi: f64) -> bool {
        self.min.as_f64() == lo && self.max.as_f64() == hi
    }
}

pub type RangeRule = (&'static str, fn(&RangeSample<'_>) -> bool);

/// Range shapes in priority order. A parameter lands in the first bucket that matches.
pub const RANGE_SHAPES: &[RangeRule] = &[
    ("0-1 (normalized)", is_normalized),
    ("-1 to 1 (bipolar)", is_bipolar),
    ("0-100 (percentage)", is_percentage),
    ("audio frequency range", is_audio_frequency),
    ("negative dB (attenuation)", is_db_attenuation),
    ("float range", is_fractional),
    ("integer range", is_anything),
];

fn is_normalized(r: &RangeSample<'_>) -> bool {
    r.spans(0.0, 1.0)
}

fn is_bipolar(r: &RangeSample<'_>) -> bool {
    r.spans(-1.0, 1.0)
}

fn is_percentage(r: &RangeSample<'_>) -> bool {
    r.spans(0.0, 100.0)
}

fn is_audio_frequency(r: &RangeSample<'_>) -> bool {
    AUDIO_FREQUENCY_LIMITS.contains(&r.max.as_f64())
}

fn is_db_attenuation(r: &RangeSample<'_>) -> bool {
    r.min.as_f64() < 0.0 && MENTIONS_DB.is_match(r.description)
}

fn is_fractional(r: &RangeSample<'_>) -> bool {
    !r.min.is_integral() || !r.max.is_integral()
}

fn is_anything(_: &RangeSample<'_>) -> bool {
    true
}

/// A `filter.parameter` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRef {
    pub filter: String,
    pub parameter: String,
}

impl ParamRef {
    pub fn new(filter: &str, parameter: &str) -> Self {
        Self {
            filter: filter.to_owned(),
            parameter: parameter.to_owned(),
        }
    }
}

/// A unit cue found in a parameter description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitHit {
    pub param: ParamRef,
    /// First characters of the lower-cased description.
    pub snippet: String,
}

/// The four groupings, each keyed by bucket label.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub native_types: BTreeMap<String, Vec<ParamRef>>,
    pub detected_units: BTreeMap<String, Vec<UnitHit>>,
    pub range_shapes: BTreeMap<String, Vec<ParamRef>>,
    pub default_shapes: BTreeMap<String, Vec<ParamRef>>,
}

impl Analysis {
    /// Sorted union of native type names and detected unit names.
    pub fn unit_vocabulary(&self) -> Vec<String> {
        self.native_types
            .keys()
            .chain(self.detected_units.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Run every grouping over every parameter of `db`.
pub fn analyze(db: &FilterDatabase) -> Analysis {
    let mut analysis = Analysis::default();

    for (filter_name, filter) in db.filters() {
        for (param_name, param) in &filter.parameters {
            let here = ParamRef::new(filter_name, param_name);

            analysis
                .native_types
                .entry(param.native_type.clone())
                .or_default()
                .push(here.clone());

            let description = param.description.to_lowercase();
            for unit in detect_units(&description) {
                analysis
                    .detected_units
                    .entry(unit.to_owned())
                    .or_default()
                    .push(UnitHit {
                        param: here.clone(),
                        snippet: description.chars().take(SNIPPET_CHARS).collect(),
                    });
            }

            if let (Some(min), Some(max)) = (param.min, param.max) {
                if let Some(shape) = classify_range(min, max, &description) {
                    analysis
                        .range_shapes
                        .entry(shape.to_owned())
                        .or_default()
                        .push(here.clone());
                }
            }

            if let Some(default) = &param.default {
                analysis
                    .default_shapes
                    .entry(classify_default(default).to_owned())
                    .or_default()
                    .push(here);
            }
        }
    }

    analysis
}

/// Units whose cue appears in `description`, once per matching detector.
///
/// Two detectors can name the same unit (`6 dB` matches both dB cues), in which case the
/// unit is yielded twice.
pub fn detect_units(description: &str) -> impl Iterator<Item = &'static str> + '_ {
    UNIT_DETECTORS
        .iter()
        .filter(move |(re, _)| re.is_match(description))
        .map(|(_, unit)| *unit)
}

/// The first [`RANGE_SHAPES`] label that matches.
pub fn classify_range(min: Number, max: Number, description: &str) -> Option<&'static str> {
    let sample = RangeSample {
        min,
        max,
        description,
    };
    RANGE_SHAPES
        .iter()
        .find(|(_, matches)| matches(&sample))
        .map(|(label, _)| *label)
}

pub fn classify_default(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Text(s) if NUMERIC_STRING.is_match(s) => "numeric string",
        Value::Text(_) => "string/enum",
        Value::Number(Number::Float(_)) => "float",
        Value::Number(Number::Int(_) | Number::UInt(_)) => "integer",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Number {
        Number::Int(n)
    }

    #[test]
    fn normalized_range_wins_over_later_rules() {
        assert_eq!(classify_range(int(0), int(1), ""), Some("0-1 (normalized)"));
        assert_eq!(
            classify_range(Number::Float(0.0), Number::Float(1.0), ""),
            Some("0-1 (normalized)")
        );
    }

    #[test]
    fn range_rules_in_priority_order() {
        assert_eq!(classify_range(int(-1), int(1), ""), Some("-1 to 1 (bipolar)"));
        assert_eq!(classify_range(int(0), int(100), ""), Some("0-100 (percentage)"));
        assert_eq!(
            classify_range(int(1), int(24000), "set frequency"),
            Some("audio frequency range")
        );
        assert_eq!(
            classify_range(int(-60), int(0), "set threshold in db"),
            Some("negative dB (attenuation)")
        );
        assert_eq!(
            classify_range(int(-60), int(0), "set feedback"),
            Some("integer range")
        );
        assert_eq!(
            classify_range(Number::Float(0.01), int(64), ""),
            Some("float range")
        );
        assert_eq!(classify_range(int(1), int(64), ""), Some("integer range"));
        assert_eq!(
            classify_range(Number::Float(1.0), Number::Float(1e6), ""),
            Some("integer range")
        );
    }

    #[test]
    fn every_input_gets_a_range_shape() {
        assert_eq!(RANGE_SHAPES.last().map(|(l, _)| *l), Some("integer range"));
    }

    #[test]
    fn unit_detectors_match_independently() {
        let units: Vec<_> = detect_units("set the cutoff frequency in hz").collect();
        assert_eq!(units, ["Hz", "Hz (implied)", "Hz (implied)"]);

        let units: Vec<_> = detect_units("gain of 6 db").collect();
        assert_eq!(units, ["dB", "dB", "gain"]);

        let units: Vec<_> = detect_units("set filter q").collect();
        assert_eq!(units, ["Q factor"]);

        assert_eq!(detect_units("quality").count(), 0);
    }

    #[test]
    fn native_types_are_grouped_verbatim() -> anyhow::Result<()> {
        let db: FilterDatabase = serde_json::from_str(
            r#"{"filters": {"f": {"parameters": {
                "missing": {},
                "empty": {"ffmpeg_type": ""},
                "gain": {"ffmpeg_type": "double"}
            }}}}"#,
        )?;
        let analysis = analyze(&db);

        assert_eq!(analysis.native_types["unknown"], [ParamRef::new("f", "missing")]);
        assert_eq!(analysis.native_types[""], [ParamRef::new("f", "empty")]);
        assert_eq!(analysis.native_types["double"], [ParamRef::new("f", "gain")]);
        Ok(())
    }

    #[test]
    fn default_shapes() {
        assert_eq!(classify_default(&Value::Bool(true)), "boolean");
        assert_eq!(classify_default(&Value::Text("-3.5".to_owned())), "numeric string");
        assert_eq!(classify_default(&Value::Text("stereo".to_owned())), "string/enum");
        assert_eq!(classify_default(&Value::Number(Number::Float(1.0))), "float");
        assert_eq!(classify_default(&Value::Number(int(2))), "integer");
    }
}
