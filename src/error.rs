//! Unified error hierarchy for loadwatch
//!
//! The analytics engine itself never fails: missing or malformed inputs are
//! closed by explicit numeric policies. Errors only arise at the boundaries
//! (data bundle files, configuration, command line arguments).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all loadwatch boundary operations
#[derive(Debug, Error)]
pub enum LoadwatchError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON data bundle could not be parsed or written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A date string that is not ISO `YYYY-MM-DD`
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// No user or record exists for the athlete id
    #[error("Athlete not found: {id}")]
    AthleteNotFound { id: String },

    /// Dotted configuration key that does not exist
    #[error("Unknown configuration key: {key}")]
    UnknownConfigKey { key: String },

    /// Data file missing on disk
    #[error("Data file not found: {path}")]
    DataFileNotFound { path: PathBuf },
}

/// Result type alias for loadwatch operations
pub type Result<T> = std::result::Result<T, LoadwatchError>;

impl LoadwatchError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LoadwatchError::InvalidDate { .. } => ErrorSeverity::Warning,
            LoadwatchError::AthleteNotFound { .. } => ErrorSeverity::Warning,
            LoadwatchError::UnknownConfigKey { .. } => ErrorSeverity::Warning,
            LoadwatchError::DataFileNotFound { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LoadwatchError::DataFileNotFound { path } => {
                format!("Could not find data file: {}", path.display())
            }
            LoadwatchError::Json(e) if e.is_data() => {
                format!(
                    "Data file has invalid content (line {}, column {}): {}",
                    e.line(),
                    e.column(),
                    e
                )
            }
            LoadwatchError::AthleteNotFound { id } => {
                format!("No athlete '{}' in the data file", id)
            }
            LoadwatchError::UnknownConfigKey { key } => {
                format!(
                    "'{}' is not a configuration key. Use `loadwatch config --list` to see all keys.",
                    key
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Bad input the user can correct
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
