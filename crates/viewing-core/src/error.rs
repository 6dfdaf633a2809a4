use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the viewing activity analyzer.
#[derive(Error, Debug)]
pub enum ViewingError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed or written.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The export is missing a column the loader depends on.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A row could not be interpreted.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    /// A timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// A duration string was not shaped like `H:MM:SS`.
    #[error("Invalid duration format: {0}")]
    InvalidDuration(String),

    /// A timezone identifier is not a known IANA zone.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The selected filters left no viewing records.
    #[error("No viewing activity matches {0}")]
    EmptyResult(String),

    /// An analysis label is not one of the recognised kinds.
    #[error("Unknown analysis: {0}")]
    UnknownAnalysis(String),

    /// A content type label is not one of the recognised types.
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    /// No `ViewingActivity.csv` was found under the given directory.
    #[error("No viewing activity export found in {0}")]
    NoExportFound(PathBuf),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the viewing crates.
pub type Result<T> = std::result::Result<T, ViewingError>;
