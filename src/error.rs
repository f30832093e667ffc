use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur while the
/// tool ingests, transforms, or projects timetable data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when no row of a sheet carries a time-slot label in its second
    /// cell.
    #[error("no time-slot header row found in sheet '{sheet}'")]
    HeaderNotFound { sheet: String },

    /// Raised when none of the extracted day tables is titled after a
    /// weekday.
    #[error("no sheet found for any of the days: {tried:?}")]
    NoWeekdaySheet { tried: Vec<String> },

    /// Raised when a timeslot label cannot be split into start and end.
    #[error("malformed time label '{label}' on {day}")]
    MalformedTimeLabel { label: String, day: String },

    /// Raised when a block endpoint fails to parse as an H:MM clock time.
    #[error("invalid clock time '{value}'")]
    DateParse { value: String },

    /// Raised when the class pattern is not a valid regular expression.
    #[error("invalid class pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
