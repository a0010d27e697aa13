//! Error handling for the motion capture pipeline
//!
//! This module defines the crate error type, a Result alias, and the
//! aggregated report returned by batch deletion.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::RecordingState;

/// Main error type for motioncap-rs operations
#[derive(Error, Debug)]
pub enum RecorderError {
    /// A command was issued in a state that does not allow it (e.g. start while active)
    #[error("Invalid state transition: cannot {action} while {from}")]
    InvalidStateTransition {
        from: RecordingState,
        action: &'static str,
    },

    /// Session file I/O failed (disk full, permission denied, ...)
    #[error("Persistence error at {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The named session file does not exist
    #[error("Session file not found: {0}")]
    NotFound(String),

    /// A session file could not be parsed back into samples
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Errors raised by the CSV reader
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<RecorderError>,
    },
}

impl RecorderError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        RecorderError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Wrap an I/O failure on a session file
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecorderError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Whether the error should be surfaced to the user rather than treated
    /// as a programming mistake
    pub fn is_recoverable(&self) -> bool {
        match self {
            RecorderError::InvalidStateTransition { .. } => false,
            RecorderError::WithContext { source, .. } => source.is_recoverable(),
            _ => true,
        }
    }

    /// Whether this is (or wraps) a `NotFound`
    pub fn is_not_found(&self) -> bool {
        match self {
            RecorderError::NotFound(_) => true,
            RecorderError::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for motioncap-rs operations
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

/// Outcome of deleting every listed session file.
///
/// Deletion keeps going after a failure, so a report can hold both
/// successes and failures at once.
#[derive(Debug, Default)]
pub struct DeleteAllReport {
    /// File names that were removed
    pub deleted: Vec<String>,
    /// File names that could not be removed, with the cause
    pub failures: Vec<(String, RecorderError)>,
}

impl DeleteAllReport {
    /// Number of files a deletion was attempted on
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failures.len()
    }

    /// True when every attempted deletion succeeded (including zero attempts)
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when some files were deleted and some were not
    pub fn is_partial(&self) -> bool {
        !self.deleted.is_empty() && !self.failures.is_empty()
    }
}
