//! `afcatalog` catalogs the audio filters of an FFmpeg build.
//!
//! This crate provides:
//! - Extraction of filter and parameter metadata by querying the `ffmpeg` executable
//! - A JSON database format shared by all tools
//! - A Markdown reference renderer
//! - A unit and range analysis with a text report and a compact JSON export
//!
//! The three binaries (`afcatalog-extract`, `afcatalog-render`, `afcatalog-analyze`) are thin
//! wrappers around these modules.

// Data model and on-disk database.
pub mod database;
pub mod model;

// Talking to FFmpeg and reading what it prints.
pub mod extract;
pub mod grammar;
pub mod tool;

// Outputs.
pub mod analysis;
pub mod markdown;
pub mod report;

pub mod opts;

mod error;
pub use error::{Error, Result};

// Logging configuration for the binaries.
#[cfg(feature = "logging")]
pub mod logging;

pub use model::{Arity, FilterDatabase, FilterRecord, Number, ParameterRecord, SemanticType, Value};
