//! Error types for weightlog.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (3=not_found, 4=validation, 6=sync, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Sync failures have their own type ([`crate::sync::SyncError`]); they only
//! reach this enum when a caller explicitly asks for the inspectable result.

use std::path::PathBuf;
use thiserror::Error;

use crate::sync::SyncError;

/// Result type alias for weightlog operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Not Found (exit 3)
    RecordNotFound,

    // Validation (exit 4)
    InvalidArgument,

    // Sync (exit 6)
    SyncNotConfigured,
    SyncError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::SyncNotConfigured => "SYNC_NOT_CONFIGURED",
            Self::SyncError => "SYNC_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::RecordNotFound => 3,
            Self::InvalidArgument => 4,
            Self::SyncNotConfigured | Self::SyncError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether retrying with corrected input can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::InvalidArgument | Self::RecordNotFound)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in weightlog operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Sync folder not configured")]
    NotConfigured,

    #[error("No record for date: {date}")]
    RecordNotFound { date: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file unreadable at {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotConfigured => ErrorCode::SyncNotConfigured,
            Self::RecordNotFound { .. } => ErrorCode::RecordNotFound,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Config(_) | Self::ConfigFile { .. } => ErrorCode::ConfigError,
            Self::Sync(_) => ErrorCode::SyncError,
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
            Self::NotConfigured => Some(
                "Pass --sync-dir <path>, set WEIGHTLOG_SYNC_DIR, \
                 or add \"sync_dir\" to the config file (see `wl config path`)"
                    .to_string(),
            ),

            Self::RecordNotFound { date } => Some(format!(
                "No entry dated '{date}'. Use `wl list` to see recorded dates."
            )),

            Self::InvalidArgument(msg) if msg.contains("delimiter") => Some(
                "Fields are stored as comma-separated text; remove ',' from the value"
                    .to_string(),
            ),

            Self::ConfigFile { path, .. } => Some(format!(
                "Fix or remove {} and try again",
                path.display()
            )),

            Self::Sync(SyncError::StabilityTimeout { .. }) => Some(
                "The cloud client may still be downloading; retry with `wl sync import`"
                    .to_string(),
            ),

            Self::InvalidArgument(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Sync(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
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

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::RecordNotFound { date: "x".into() }.exit_code(), 3);
        assert_eq!(Error::InvalidArgument("bad".into()).exit_code(), 4);
        assert_eq!(Error::NotConfigured.exit_code(), 6);
        assert_eq!(Error::Config("bad".into()).exit_code(), 7);
        assert_eq!(Error::Io(std::io::Error::other("disk")).exit_code(), 8);
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let json = Error::NotConfigured.to_structured_json();
        assert_eq!(json["error"]["code"], "SYNC_NOT_CONFIGURED");
        assert_eq!(json["error"]["exit_code"], 6);
        assert!(json["error"]["hint"].as_str().unwrap().contains("--sync-dir"));
    }

    #[test]
    fn test_delimiter_hint() {
        let err = Error::InvalidArgument("weight contains the delimiter ','".into());
        assert!(err.hint().is_some());
        assert!(Error::InvalidArgument("other".into()).hint().is_none());
    }
}
