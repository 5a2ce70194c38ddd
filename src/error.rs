//! Error handling types for kirinuki
//!
//! Invariant violations (malformed ranges, gaps, edits that cannot be composed)
//! are reported as errors to the caller. Budget infeasibility and out-of-range
//! selections are not errors; they have specified outputs.

use thiserror::Error;

/// Comprehensive error type for summarization and projection operations
#[derive(Debug, Error)]
pub enum KirinukiError {
    /// A range was constructed with `start > end`
    #[error("Invalid range: start={start}, end={end}")]
    InvalidRange { start: usize, end: usize },

    /// A gap between syntax siblings was constructed with `start > end`
    #[error("Invalid gap: start={start}, end={end}")]
    InvalidGap { start: usize, end: usize },

    /// Replacements of an edit are unsorted or overlapping
    #[error("Invalid edit: {message}")]
    InvalidEdit { message: String },

    /// Two edits against a common ancestor overlap and cannot be rebased
    #[error("Rebase conflict: {message}")]
    RebaseConflict { message: String },

    /// Parser could not be configured or produced no tree
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// No bundled grammar for the requested language
    #[error("Unsupported language: {language}")]
    UnsupportedLanguage { language: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for kirinuki operations
pub type KirinukiResult<T> = Result<T, KirinukiError>;

/// Helper functions for common error patterns
impl KirinukiError {
    /// Create an invalid range error
    pub fn invalid_range(start: usize, end: usize) -> Self {
        KirinukiError::InvalidRange { start, end }
    }

    /// Create an invalid gap error
    pub fn invalid_gap(start: usize, end: usize) -> Self {
        KirinukiError::InvalidGap { start, end }
    }

    /// Create an invalid edit error
    pub fn invalid_edit(message: impl Into<String>) -> Self {
        KirinukiError::InvalidEdit {
            message: message.into(),
        }
    }

    /// Create a rebase conflict error
    pub fn rebase_conflict(message: impl Into<String>) -> Self {
        KirinukiError::RebaseConflict {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        KirinukiError::Parse {
            message: message.into(),
        }
    }

    /// Create an unsupported language error
    pub fn unsupported_language(language: impl Into<String>) -> Self {
        KirinukiError::UnsupportedLanguage {
            language: language.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        KirinukiError::Config {
            message: message.into(),
        }
    }
}
