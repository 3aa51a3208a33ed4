//! Error types for contacts-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading a card
///
/// Every variant carries the 1-based line number (empty lines are not counted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Line has no `:` between keyword and value
    #[error("invalid line {line}: missing ':' separator")]
    Grammar { line: usize },

    /// Keyword or value does not match what the card grammar expects here
    #[error("expected {expected} but got {found} instead on line {line}")]
    Sequence {
        line: usize,
        expected: String,
        found: String,
    },

    /// Keyword outside the supported field set
    #[error("unknown field {field} on line {line}")]
    UnknownField { line: usize, field: String },

    /// Parameter name outside the supported `TEL` parameters
    #[error("unknown param {param} on line {line}")]
    UnknownParam { line: usize, param: String },
}

impl ParseError {
    /// Line on which the error occurred
    pub fn line(&self) -> usize {
        match self {
            ParseError::Grammar { line }
            | ParseError::Sequence { line, .. }
            | ParseError::UnknownField { line, .. }
            | ParseError::UnknownParam { line, .. } => *line,
        }
    }
}

/// Errors that can occur in contacts-core
#[derive(Debug, Error)]
pub enum Error {
    /// Card text was rejected by the parser
    #[error("failed to parse card: {0}")]
    Parse(#[from] ParseError),

    /// Card file was rejected by the parser
    #[error("failed to parse card '{path}': {source}")]
    CardFile {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Merge requested for a contact with no duplicate in the list
    #[error("contact '{name}' is singleton: nothing to merge with")]
    Singleton { name: String },

    /// Export separator must be a single byte
    #[error("invalid separator '{0}': must be a single ASCII character")]
    InvalidSeparator(String),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
