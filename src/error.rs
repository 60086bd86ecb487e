//! Error types for Aurorae Haven.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=storage, 4=validation, 6=import, etc.)
//! - Retryability flags for scripted callers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Aurorae Haven operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Storage (exit 2)
    StorageError,
    DatabaseError,

    // Validation (exit 4)
    ValidationFailed,
    InvalidArgument,

    // Import (exit 6)
    ImportFailed,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    FileReadError,
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::StorageError => "STORAGE_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::ImportFailed => "IMPORT_FAILED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::FileReadError => "FILE_READ_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::StorageError | Self::DatabaseError => 2,
            Self::ValidationFailed | Self::InvalidArgument => 4,
            Self::ImportFailed => 6,
            Self::ConfigError => 7,
            Self::FileReadError | Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether a caller should retry with corrected input.
    ///
    /// True for shape problems in the payload or arguments. False for
    /// unreadable files, storage or internal errors.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed | Self::InvalidArgument | Self::ImportFailed
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Aurorae Haven operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A document failed shape validation. Every failing rule is listed.
    #[error("Validation failed: {}", errors.join(", "))]
    Validation { errors: Vec<String> },

    /// The file handed to an import could not be read.
    #[error("Failed to read file {}: {message}", path.display())]
    FileRead { path: PathBuf, message: String },

    /// An import was rejected (parse or shape failure).
    #[error("Import failed: {0}")]
    Import(String),

    /// The key-string store could not be written.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::FileRead { .. } => ErrorCode::FileReadError,
            Self::Import(_) => ErrorCode::ImportFailed,
            Self::Storage(_) => ErrorCode::StorageError,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::FileRead { path, .. } => Some(format!(
                "Check that '{}' exists and is readable.",
                path.display()
            )),

            Self::Import(msg) if msg.starts_with("Invalid JSON") => Some(
                "The file is not valid JSON. Use a file produced by `haven export`.".to_string(),
            ),

            Self::Import(_) | Self::Validation { .. } => Some(
                "An export needs `version` and `exportedAt`; domain fields \
                 (tasks, sequences, habits, dumps, schedule) must be arrays."
                    .to_string(),
            ),

            Self::Storage(_) => Some(
                "Check that the data directory is writable (see `--data-dir`).".to_string(),
            ),

            Self::Config(_) => Some(
                "Fix or remove config.json in the data directory to use defaults.".to_string(),
            ),

            Self::Database(_) | Self::Io(_) | Self::Json(_) | Self::InvalidArgument(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Self::Validation { errors } = self {
            obj["error"]["details"] = serde_json::json!(errors);
        }

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
