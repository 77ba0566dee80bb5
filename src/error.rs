//! Error types.
//!
//! Parse errors are fatal at load time: a malformed schedule entry cannot
//! be defaulted. Everything recoverable is reported through
//! [`Diagnostic`](crate::validation::Diagnostic) instead.

use std::path::PathBuf;

/// A time-window string could not be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} in '{input}'")]
pub struct ParseError {
    /// Error category.
    pub kind: ParseErrorKind,
    /// The offending input.
    pub input: String,
}

/// Categories of parse errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input is not `"<Weekday> HH:MM-HH:MM"`.
    #[error("expected '<Weekday> HH:MM-HH:MM'")]
    Format,
    /// No weekday name starts with the given prefix.
    #[error("could not understand day '{0}'")]
    UnknownWeekday(String),
    /// A time of day is not a 24-hour `HH:MM` value.
    #[error("invalid time '{0}'")]
    InvalidTime(String),
    /// Start is not strictly before end.
    #[error("window does not end after it starts")]
    EmptyInterval,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }
}

/// Loading or saving a schedule failed.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written.
    #[error("cannot access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File is not valid against the schema.
    #[error("invalid schedule file {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A team or mentor carries a malformed time window.
    #[error("bad time window for '{owner}'")]
    Window {
        /// Team id or mentor name.
        owner: String,
        #[source]
        source: ParseError,
    },
}

/// An iCalendar document could not be read.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("calendar line {line}: {message}")]
pub struct CalendarError {
    /// 1-based line number (after unfolding) where the problem was found.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}
