use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::{Error, Result};

/// Source of the three text outputs the extractor understands.
///
/// [`FfmpegTool`] shells out to a real binary; tests plug in canned text instead.
pub trait FilterTool {
    /// Output of `<tool> -version`.
    fn version_output(&self) -> Result<String>;

    /// Output of `<tool> -filters`.
    fn filter_list_output(&self) -> Result<String>;

    /// Output of `<tool> -h filter=<name>`.
    fn filter_help_output(&self, name: &str) -> Result<String>;
}

/// Runs an FFmpeg executable, one blocking call at a time.
///
/// There is no timeout: a hung child hangs the caller.
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    path: PathBuf,
}

impl FfmpegTool {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the tool and return stdout followed by stderr.
    ///
    /// FFmpeg prints help to either stream depending on version, so we read both. The exit
    /// status is ignored; only a failure to start the process is an error.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Tool {
                command: format!("{} {}", self.path.display(), args.join(" ")),
                source,
            })?;

        if !output.status.success() {
            debug!(
                tool = %self.path.display(),
                ?args,
                status = %output.status,
                "tool exited unsuccessfully"
            );
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

impl FilterTool for FfmpegTool {
    fn version_output(&self) -> Result<String> {
        self.run(&["-version"])
    }

    fn filter_list_output(&self) -> Result<String> {
        self.run(&["-filters"])
    }

    fn filter_help_output(&self, name: &str) -> Result<String> {
        self.run(&["-h", &format!("filter={name}")])
    }
}
