//! Text report and JSON export for an [`Analysis`].

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::Result;
use crate::analysis::{Analysis, ParamRef};
use crate::database::write_atomic;
use crate::model::FilterDatabase;

const RULE: &str =
    "======================================================================";
const THIN_RULE: &str =
    "----------------------------------------------------------------------";

/// How many `filter.parameter` examples a report row shows.
const EXAMPLES_PER_ROW: usize = 3;

const MAPPING_STRATEGIES: &str = "
Based on analysis, these mapping strategies are needed:

| Input Type          | FFmpeg Accepts        | Mapping Required           |
|---------------------|-----------------------|----------------------------|
| 0-1 normalized      | 0-1                   | None (direct)              |
| 0-1 normalized      | 0-100                 | multiply by 100            |
| 0-1 normalized      | min-max float         | linear interpolation       |
| 0-1 normalized      | frequency (Hz)        | logarithmic interpolation  |
| 0-1 normalized      | dB                    | linear (dB is perceptual)  |
| 0-1 normalized      | time (ms/s)           | linear or log (context)    |
| -1 to 1 (bipolar)   | centered range        | scale and offset           |
| boolean             | 0/1                   | threshold at 0.5           |
| enum/string         | specific values       | quantize to options        |
";

const CURVE_TYPES: &str = "
| Parameter Context     | Curve Type   | Reason                              |
|-----------------------|--------------|-------------------------------------|
| Frequency, Hz, cutoff | Logarithmic  | Perceptually linear (octaves)       |
| dB, gain, level       | Linear       | Already perceptually scaled         |
| Time (attack/release) | Logarithmic  | Small values more critical          |
| Time (delay/duration) | Linear       | Usually linear perception           |
| Mix, wet/dry, blend   | Linear       | Direct percentage                   |
| Q factor              | Logarithmic  | Wide range, low values critical     |
| Ratio (compressor)    | Logarithmic  | 1:1 to 20:1 spans wide range        |
| Depth, width          | Linear       | Usually 0-1 or percentage           |
| Percentage (0-100)    | Linear       | Direct mapping                      |
";

/// Compact summary written by `afcatalog-analyze <input> <export>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisExport {
    pub ffmpeg_types: Vec<String>,
    pub detected_units: Vec<String>,
    pub unit_vocabulary: Vec<String>,
    pub full_analysis: GroupSizes,
}

/// Bucket sizes of every grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSizes {
    pub ffmpeg_types: BTreeMap<String, usize>,
    pub detected_units: BTreeMap<String, usize>,
    pub range_patterns: BTreeMap<String, usize>,
    pub default_patterns: BTreeMap<String, usize>,
}

impl AnalysisExport {
    pub fn new(analysis: &Analysis) -> Self {
        Self {
            ffmpeg_types: analysis.native_types.keys().cloned().collect(),
            detected_units: analysis.detected_units.keys().cloned().collect(),
            unit_vocabulary: analysis.unit_vocabulary(),
            full_analysis: GroupSizes {
                ffmpeg_types: sizes(&analysis.native_types),
                detected_units: sizes(&analysis.detected_units),
                range_patterns: sizes(&analysis.range_shapes),
                default_patterns: sizes(&analysis.default_shapes),
            },
        }
    }
}

fn sizes<T>(groups: &BTreeMap<String, Vec<T>>) -> BTreeMap<String, usize> {
    groups.iter().map(|(k, v)| (k.clone(), v.len())).collect()
}

/// Write the export JSON to `path`.
pub fn write_export(path: &Path, analysis: &Analysis) -> Result<()> {
    let export = AnalysisExport::new(analysis);
    write_atomic(path, |w| {
        serde_json::to_writer_pretty(&mut *w, &export)?;
        Ok(())
    })
}

/// Print the full analysis report.
pub fn write_report<W: Write>(
    w: &mut W,
    db: &FilterDatabase,
    analysis: &Analysis,
) -> std::io::Result<()> {
    writeln!(w, "{RULE}")?;
    writeln!(w, "FFMPEG AUDIO FILTER UNIT ANALYSIS")?;
    writeln!(w, "FFmpeg Version: {}", db.ffmpeg_version())?;
    writeln!(w, "Total Filters: {}", db.filter_count())?;
    writeln!(w, "{RULE}")?;

    writeln!(w, "\n## FFmpeg Parameter Types\n")?;
    write_groups(w, "Type", 20, &analysis.native_types, |p| p)?;

    writeln!(w, "\n\n## Detected Unit Types (from descriptions)\n")?;
    write_groups(w, "Unit", 20, &analysis.detected_units, |hit| &hit.param)?;

    writeln!(w, "\n\n## Range Patterns\n")?;
    write_groups(w, "Pattern", 30, &analysis.range_shapes, |p| p)?;

    writeln!(w, "\n\n## Default Value Patterns\n")?;
    write_groups(w, "Pattern", 30, &analysis.default_shapes, |p| p)?;

    writeln!(w, "\n\n## Automation Mapping Summary")?;
    write!(w, "{MAPPING_STRATEGIES}")?;

    writeln!(w, "\n## Suggested Curve Types for Automation")?;
    write!(w, "{CURVE_TYPES}")?;

    writeln!(w, "\n{RULE}")?;
    writeln!(w, "SIMPLE UNIT TYPE LIST")?;
    writeln!(w, "{RULE}")?;
    writeln!(
        w,
        "\nFFmpeg types: {}",
        analysis
            .native_types
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    )?;
    writeln!(
        w,
        "\nDetected units: {}",
        analysis
            .detected_units
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// One table: largest bucket first, ties by label.
fn write_groups<W, T, F>(
    w: &mut W,
    heading: &str,
    width: usize,
    groups: &BTreeMap<String, Vec<T>>,
    param_of: F,
) -> std::io::Result<()>
where
    W: Write,
    F: Fn(&T) -> &ParamRef,
{
    writeln!(w, "{heading:<width$} {:<8} Examples", "Count")?;
    writeln!(w, "{THIN_RULE}")?;

    let mut rows: Vec<_> = groups.iter().collect();
    rows.sort_by_key(|(label, members)| (Reverse(members.len()), *label));

    for (label, members) in rows {
        let refs: Vec<&ParamRef> = members.iter().map(&param_of).collect();
        writeln!(
            w,
            "{label:<width$} {:<8} {}",
            members.len(),
            examples(&refs)
        )?;
    }
    Ok(())
}

/// Up to three `filter.parameter` names, plus `(+N more)`.
pub fn examples(refs: &[&ParamRef]) -> String {
    let mut out = refs
        .iter()
        .take(EXAMPLES_PER_ROW)
        .map(|r| format!("{}.{}", r.filter, r.parameter))
        .collect::<Vec<_>>()
        .join(", ");

    if refs.len() > EXAMPLES_PER_ROW {
        out.push_str(&format!(" (+{} more)", refs.len() - EXAMPLES_PER_ROW));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::UnitHit;

    fn refs(n: usize) -> Vec<ParamRef> {
        (0..n).map(|i| ParamRef::new("f", &format!("p{i}"))).collect()
    }

    #[test]
    fn examples_show_three_and_count_the_rest() {
        let five = refs(5);
        let borrowed: Vec<_> = five.iter().collect();
        assert_eq!(examples(&borrowed), "f.p0, f.p1, f.p2 (+2 more)");
        assert_eq!(examples(&borrowed[..2]), "f.p0, f.p1");
    }

    #[test]
    fn rows_sort_by_size_then_label() -> anyhow::Result<()> {
        let mut groups = BTreeMap::new();
        groups.insert("small".to_owned(), refs(1));
        groups.insert("big".to_owned(), refs(4));
        groups.insert("also small".to_owned(), refs(1));

        let mut out = Vec::new();
        write_groups(&mut out, "Type", 20, &groups, |p| p)?;
        let text = String::from_utf8(out)?;
        let labels: Vec<_> = text
            .lines()
            .skip(2)
            .map(|l| l.split("  ").next().unwrap_or_default())
            .collect();
        assert_eq!(labels, ["big", "also small", "small"]);
        Ok(())
    }

    #[test]
    fn export_sorts_names_and_counts_every_grouping() {
        let mut analysis = Analysis::default();
        analysis.native_types.insert("int".to_owned(), refs(2));
        analysis.native_types.insert("double".to_owned(), refs(1));
        analysis.detected_units.insert(
            "Hz".to_owned(),
            vec![UnitHit {
                param: ParamRef::new("lowpass", "f"),
                snippet: "set frequency".to_owned(),
            }],
        );
        analysis.default_shapes.insert("float".to_owned(), refs(1));

        let export = AnalysisExport::new(&analysis);
        assert_eq!(export.ffmpeg_types, ["double", "int"]);
        assert_eq!(export.detected_units, ["Hz"]);
        assert_eq!(export.unit_vocabulary, ["Hz", "double", "int"]);
        assert_eq!(export.full_analysis.ffmpeg_types["int"], 2);
        assert_eq!(export.full_analysis.default_patterns["float"], 1);
        assert!(export.full_analysis.range_patterns.is_empty());
    }
}
