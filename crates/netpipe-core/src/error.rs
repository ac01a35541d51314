use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the netpipe pipeline.
///
/// Every variant is a structural failure: by the time one of these is raised
/// the run is already doomed and no output tables will be written. Rows that
/// merely fail quality rules never become a `PipelineError` – they are
/// quarantined into the invalid-records table instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input or output file could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV row could not be parsed (wrong column count, broken quoting).
    /// `row` is 1-based and counts the header as row 1.
    #[error("Malformed CSV row {row} in {path}: {message}")]
    CsvRow {
        path: PathBuf,
        row: usize,
        message: String,
    },

    /// A required column is absent from a CSV header.
    #[error("Missing column \"{column}\" in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A line of a JSONL source is not valid JSON.
    #[error("Malformed JSON on line {line} of {path}: {source}")]
    JsonLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A JSONL object is missing a required field or carries a non-string
    /// value where a string is expected.
    #[error("Missing or non-string field \"{field}\" on line {line} of {path}")]
    MissingField {
        path: PathBuf,
        line: usize,
        field: String,
    },

    /// An output table could not be written.
    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the netpipe crates.
pub type Result<T> = std::result::Result<T, PipelineError>;
