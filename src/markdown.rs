//! Markdown reference rendering for a [`FilterDatabase`].
//!
//! Output is deterministic: filters come out in name order and parameters in name order, so
//! rendering the same database twice produces identical bytes.

use std::io::Write;
use std::path::Path;

use crate::Result;
use crate::database::write_atomic;
use crate::model::{FilterDatabase, FilterRecord, Number, ParameterRecord, Value};

pub const SUPPORTED: &str = "✓";
pub const UNSUPPORTED: &str = "✗";
pub const AUTOMATABLE: &str = "🎛️";
/// Placeholder for an empty cell.
pub const NONE: &str = "—";

const LEGEND: &str = "\
## Legend

| Symbol | Meaning |
|--------|---------|
| ✓ | Feature supported |
| ✗ | Feature not supported |
| 🎛️ | Parameter is automatable (can be changed at runtime) |

### Parameter Types

| Type | Description | Units/Notes |
|------|-------------|-------------|
| integer | Whole number | count, samples, bits |
| float | Decimal number | linear gain, ratio |
| boolean | true/false | 0/1 |
| string | Text value | expressions, filenames |
| duration | Time value | seconds, or HH:MM:SS.ms |
| flags | Bitfield | combined options |
| channel_layout | Channel config | stereo, 5.1, etc. |
| sample_format | Sample format | s16, s32, flt, dbl |

### Common Unit Conventions

| Suffix/Context | Unit | Example |
|----------------|------|---------|
| dB | Decibels | `volume=6dB` |
| Hz | Hertz (frequency) | `lowpass=f=1000` |
| ms | Milliseconds | `adelay=500` |
| % | Percentage | (rarely used directly) |

---

## Filters
";

const AUTOMATION_NOTES: &str = "\
---

## Automation & Modulation Notes

### Which Parameters Can Be Automated?

Parameters marked with 🎛️ support runtime changes via FFmpeg's command system. This is indicated by the 'T' flag in FFmpeg's help output.

### FFmpeg's sendcmd Filter

You can automate parameter changes over time using the `sendcmd` filter:

```bash
# Commands file format (cmds.txt):
# <time> <target> <command> <arg>
0.0 volume volume 0.5;
1.0 volume volume 1.0;
2.0 volume volume 0.25;

# Apply automation:
ffmpeg -i input.wav -af \"sendcmd=f=cmds.txt,volume@v\" output.wav
```

### Real-time Control via Named Pipes (Advanced)

```bash
# Create a named pipe
mkfifo /tmp/ffmpeg_cmds

# Run FFmpeg reading commands from pipe
ffmpeg -i input.wav -af \"sendcmd=f=/tmp/ffmpeg_cmds,volume\" output.wav &

# Send commands in real-time
echo \"0 volume volume 0.5\" > /tmp/ffmpeg_cmds
```

### Units and Value Formats

FFmpeg accepts values in their native units, no normalization needed:

| Parameter Type | Input Format | Example |
|----------------|--------------|---------|
| Volume/Gain | Linear or dB | `1.5` or `3dB` |
| Frequency | Hz | `1000` or `1k` |
| Time | Seconds or timestamp | `0.5` or `00:00:00.500` |
| Percentage | Decimal (0-1) | `0.75` for 75% |

### Building Your Own Automation

When building a GUI automation system:

1. **Store values in native units** (dB, Hz, etc.). FFmpeg handles them directly
2. **Use the 'automatable' flag** from this database to determine which knobs to expose
3. **Generate sendcmd-compatible output** for time-based automation
4. **Consider the filter's command_support flag** for filters that support runtime changes

---

## Appendix: Automatable Parameters Quick Reference
";

/// Render `db` into `path`, replacing it atomically.
pub fn write_file(path: &Path, db: &FilterDatabase) -> Result<()> {
    write_atomic(path, |w| {
        write_markdown(w, db)?;
        Ok(())
    })
}

/// Render `db` as a complete Markdown document.
pub fn write_markdown<W: Write>(w: &mut W, db: &FilterDatabase) -> std::io::Result<()> {
    write_title(w, db)?;
    write_contents(w, db)?;

    w.write_all(LEGEND.as_bytes())?;
    for (name, filter) in db.filters() {
        write_filter(w, name, filter)?;
    }

    writeln!(w)?;
    w.write_all(AUTOMATION_NOTES.as_bytes())?;
    write_appendix(w, db)?;

    writeln!(w, "\n---\n")?;
    writeln!(w, "*Generated by afcatalog-render*")?;
    Ok(())
}

fn write_title<W: Write>(w: &mut W, db: &FilterDatabase) -> std::io::Result<()> {
    writeln!(w, "# FFmpeg Audio Filters Reference\n")?;
    writeln!(w, "> **FFmpeg Version:** {}  ", db.ffmpeg_version())?;
    writeln!(w, "> **Generated:** {}  ", db.generated())?;
    writeln!(w, "> **Total Filters:** {}\n", db.filter_count())?;
    writeln!(w, "---\n")
}

fn write_contents<W: Write>(w: &mut W, db: &FilterDatabase) -> std::io::Result<()> {
    writeln!(w, "## Table of Contents\n")?;
    for name in db.filters().keys() {
        writeln!(w, "- [{name}](#{})", anchor(name))?;
    }
    writeln!(w, "\n---\n")
}

fn write_filter<W: Write>(w: &mut W, name: &str, filter: &FilterRecord) -> std::io::Result<()> {
    writeln!(w, "\n---\n")?;
    writeln!(w, "### {name}\n")?;

    if filter.description.is_empty() {
        writeln!(w, "No description available.\n")?;
    } else {
        writeln!(w, "{}\n", filter.description)?;
    }

    writeln!(w, "| Property | Value |")?;
    writeln!(w, "|----------|-------|")?;
    writeln!(w, "| Timeline Support | {} |", mark(filter.timeline_support))?;
    writeln!(w, "| Slice Threading | {} |", mark(filter.slice_threading))?;
    writeln!(w, "| Command Support | {} |", mark(filter.command_support))?;
    writeln!(w, "| Inputs | {} |", filter.inputs)?;
    writeln!(w, "| Outputs | {} |", filter.outputs)?;
    writeln!(w)?;

    if filter.parameters.is_empty() {
        writeln!(w, "*This filter has no configurable parameters.*\n")?;
    } else {
        writeln!(w, "#### Parameters\n")?;
        writeln!(w, "| Parameter | Type | Range | Default | Auto | Description |")?;
        writeln!(w, "|-----------|------|-------|---------|------|-------------|")?;
        for (param_name, param) in &filter.parameters {
            writeln!(w, "{}", parameter_row(param_name, param))?;
        }
        writeln!(w)?;
    }

    writeln!(w, "**Basic Usage:**")?;
    writeln!(w, "```bash")?;
    writeln!(w, "{}", usage_example(name))?;
    writeln!(w, "```\n")
}

fn write_appendix<W: Write>(w: &mut W, db: &FilterDatabase) -> std::io::Result<()> {
    writeln!(w, "\n| Filter | Automatable Parameters |")?;
    writeln!(w, "|--------|------------------------|")?;

    for (name, filter) in db.filters() {
        let params: Vec<_> = filter
            .automatable_parameters()
            .map(|p| format!("`{p}`"))
            .collect();
        if !params.is_empty() {
            writeln!(w, "| {name} | {} |", params.join(", "))?;
        }
    }
    Ok(())
}

/// One row of a filter's parameter table.
pub fn parameter_row(name: &str, param: &ParameterRecord) -> String {
    format!(
        "| `{name}` | {} | {} | {} | {} | {} |",
        param.kind,
        format_range(param.min, param.max),
        escape_cell(&format_default(param.default.as_ref())),
        if param.automatable { AUTOMATABLE } else { NONE },
        escape_cell(&param.description),
    )
}

/// `min → max`, `≥ min`, `≤ max`, or a dash.
pub fn format_range(min: Option<Number>, max: Option<Number>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{lo} → {hi}"),
        (Some(lo), None) => format!("≥ {lo}"),
        (None, Some(hi)) => format!("≤ {hi}"),
        (None, None) => NONE.to_owned(),
    }
}

pub fn format_default(value: Option<&Value>) -> String {
    match value {
        Some(v) => format!("`{v}`"),
        None => NONE.to_owned(),
    }
}

/// Keep free text from breaking a table row.
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// GitHub-style heading anchor for a filter name.
pub fn anchor(name: &str) -> String {
    name.to_lowercase().replace('_', "-")
}

pub fn usage_example(name: &str) -> String {
    format!("ffmpeg -i input.wav -af \"{name}\" output.wav")
}

fn mark(supported: bool) -> &'static str {
    if supported { SUPPORTED } else { UNSUPPORTED }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{Arity, SemanticType};

    fn param(min: Option<Number>, max: Option<Number>, automatable: bool) -> ParameterRecord {
        ParameterRecord {
            kind: SemanticType::Integer,
            native_type: "int".to_owned(),
            description: "a | b\nc".to_owned(),
            min,
            max,
            default: None,
            automatable,
        }
    }

    fn render(db: &FilterDatabase) -> anyhow::Result<String> {
        let mut out = Vec::new();
        write_markdown(&mut out, db)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn ranges_cover_all_bound_combinations() {
        assert_eq!(format_range(Some(Number::Int(0)), Some(Number::Int(1))), "0 → 1");
        assert_eq!(format_range(Some(Number::Int(0)), None), "≥ 0");
        assert_eq!(format_range(None, Some(Number::Float(0.5))), "≤ 0.5");
        assert_eq!(format_range(None, None), "—");
    }

    #[test]
    fn defaults_are_code_spans() {
        assert_eq!(format_default(None), "—");
        assert_eq!(format_default(Some(&Value::Number(Number::Float(1.0)))), "`1.0`");
        assert_eq!(format_default(Some(&Value::Text("stereo".to_owned()))), "`stereo`");
    }

    #[test]
    fn cells_escape_pipes_and_newlines() {
        assert_eq!(escape_cell("a | b\nc"), "a \\| b c");
        let row = parameter_row("n", &param(None, None, false));
        assert_eq!(row, "| `n` | integer | — | — | — | a \\| b c |");
    }

    #[test]
    fn pipes_in_defaults_do_not_split_the_row() {
        let mut p = param(None, None, true);
        p.kind = SemanticType::String;
        p.description = "set imaginary filters params".to_owned();
        p.default = Some(Value::Text("\"c0 f=200 t=0|c1 f=200 t=0\"".to_owned()));

        let row = parameter_row("params", &p);
        assert_eq!(
            row,
            "| `params` | string | — | `\"c0 f=200 t=0\\|c1 f=200 t=0\"` | 🎛️ | set imaginary filters params |"
        );
        assert_eq!(row.matches(" | ").count(), 5);
    }

    #[test]
    fn anchors_are_lowercase_with_hyphens() {
        assert_eq!(anchor("Some_Filter"), "some-filter");
    }

    #[test]
    fn filter_without_parameters_gets_notice_and_no_appendix_row() -> anyhow::Result<()> {
        let mut filters = BTreeMap::new();
        filters.insert(
            "anull".to_owned(),
            FilterRecord {
                description: "Pass the source unchanged to the output.".to_owned(),
                ..FilterRecord::default()
            },
        );
        let db = FilterDatabase::new("7.1", "2025-01-01T00:00:00Z", filters);
        let md = render(&db)?;

        assert!(
            md.starts_with("# FFmpeg Audio Filters Reference\n\n> **FFmpeg Version:** 7.1  \n")
        );
        assert!(md.contains("- [anull](#anull)\n"));
        assert!(md.contains("*This filter has no configurable parameters.*"));
        assert!(md.contains("ffmpeg -i input.wav -af \"anull\" output.wav"));
        assert!(!md.contains("| anull |"));
        assert!(md.ends_with("*Generated by afcatalog-render*\n"));
        Ok(())
    }

    #[test]
    fn appendix_lists_automatable_parameters() -> anyhow::Result<()> {
        let mut parameters = BTreeMap::new();
        parameters.insert("delays".to_owned(), param(None, None, true));
        parameters.insert("decays".to_owned(), param(None, None, true));
        parameters.insert("in_gain".to_owned(), param(None, None, false));

        let mut filters = BTreeMap::new();
        filters.insert(
            "aecho".to_owned(),
            FilterRecord {
                command_support: true,
                inputs: Arity::Count(1),
                outputs: Arity::Dynamic,
                parameters,
                ..FilterRecord::default()
            },
        );
        let db = FilterDatabase::new("7.1", "t", filters);
        let md = render(&db)?;

        assert!(md.contains("| aecho | `decays`, `delays` |"));
        assert!(md.contains("| Command Support | ✓ |"));
        assert!(md.contains("| Timeline Support | ✗ |"));
        assert!(md.contains("| Outputs | dynamic |"));
        Ok(())
    }
}
