use std::path::PathBuf;

/// Where the extractor looks for FFmpeg unless told otherwise.
pub const DEFAULT_FFMPEG_PATH: &str = "/usr/local/bin/ffmpeg";

/// The database file shared by all three tools.
pub const DEFAULT_DATABASE_PATH: &str = "ffmpeg-audio-filters.json";

/// The renderer's default Markdown output.
pub const DEFAULT_MARKDOWN_PATH: &str = "ffmpeg-audio-filters.md";

/// Options for an extraction run.
///
/// These are *library-level configuration*, not CLI flags directly. The binaries map their
/// arguments into these types so the library stays usable from tests and other frontends.
#[derive(Debug, Clone)]
pub struct ExtractOpts {
    /// FFmpeg executable to query.
    pub ffmpeg_path: PathBuf,

    /// Where the database JSON is written.
    pub output_path: PathBuf,
}

impl Default for ExtractOpts {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG_PATH),
            output_path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

/// Options for rendering a database to Markdown.
#[derive(Debug, Clone)]
pub struct RenderOpts {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            output_path: PathBuf::from(DEFAULT_MARKDOWN_PATH),
        }
    }
}

/// Options for the unit analysis report.
#[derive(Debug, Clone)]
pub struct AnalyzeOpts {
    pub input_path: PathBuf,

    /// When set, a compact JSON summary is written here as well.
    pub export_path: Option<PathBuf>,
}

impl Default for AnalyzeOpts {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            export_path: None,
        }
    }
}
