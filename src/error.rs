use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

/// afcatalog's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// afcatalog's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    /// A database or report input path does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The filter listing produced no audio filters at all.
    #[error("no audio filters found (check that FFmpeg is installed and the path is correct)")]
    NoAudioFilters,

    /// The external tool could not be started.
    #[error("failed to run `{command}`")]
    Tool {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_not_found_names_the_path() {
        let err = Error::InputNotFound(PathBuf::from("missing.json"));
        assert_eq!(err.to_string(), "input file not found: missing.json");
    }

    #[test]
    fn anyhow_errors_keep_their_context_chain() {
        let err: Error = anyhow::anyhow!("inner").context("outer").into();
        assert_eq!(err.to_string(), "outer: inner");
    }
}
