//! Error types for tracker-core
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! The crate is a read-mostly storage layer, so most variants describe
//! database, configuration or file failures. Storage faults are not
//! reinterpreted here; they surface to the caller as `SqlxError`.

use thiserror::Error;

/// Result type alias using our TrackerError type
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Main error type for tracker-core
#[derive(Error, Debug)]
pub enum TrackerError {
    // ===== Database Errors =====

    /// Generic database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Database query execution failed
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// Database schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database record not found
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    // ===== Validation Errors =====

    /// Generic input validation error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration values are invalid or incomplete
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // ===== File/Configuration Errors =====

    /// Configuration file could not be read or written
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Generic file I/O error with path context
    #[error("File I/O error: {0}")]
    FileIoError(String),

    // ===== General Errors =====

    /// Application state is invalid for the requested operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal error that should not normally occur
    #[error("Internal error: {0}")]
    InternalError(String),

    // ===== External Library Errors =====
    // Automatic conversions from external error types

    /// Database driver error from sqlx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlDeError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<std::num::ParseIntError> for TrackerError {
    fn from(err: std::num::ParseIntError) -> Self {
        TrackerError::InvalidInput(format!("Failed to parse integer: {}", err))
    }
}

// Helper methods for creating common errors
impl TrackerError {
    /// Create a RecordNotFound error with a resource name
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        TrackerError::RecordNotFound(resource.into())
    }

    /// Create an InvalidInput error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        TrackerError::InvalidInput(message.into())
    }

    /// Create an InternalError with a message
    pub fn internal<S: Into<String>>(message: S) -> Self {
        TrackerError::InternalError(message.into())
    }

    /// Check if the error came from the storage layer
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            TrackerError::DatabaseError(_)
                | TrackerError::QueryFailed(_)
                | TrackerError::MigrationFailed(_)
                | TrackerError::SqlxError(_)
        )
    }

    /// Check if the error means a requested row does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TrackerError::RecordNotFound(_) | TrackerError::SqlxError(sqlx::Error::RowNotFound)
        )
    }

    /// Check if error is related to configuration or config files
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TrackerError::InvalidConfiguration(_)
                | TrackerError::ConfigurationError(_)
                | TrackerError::TomlDeError(_)
                | TrackerError::TomlSerError(_)
        )
    }

    /// Get user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            TrackerError::MigrationFailed(reason) => {
                format!("The library database could not be upgraded ({}). Try restoring a backup.", reason)
            }
            TrackerError::SqlxError(sqlx::Error::PoolTimedOut) => {
                "The library database is busy. Please try again in a moment.".to_string()
            }
            TrackerError::TomlDeError(e) => {
                format!("The configuration file is malformed: {}", e.message())
            }
            TrackerError::RecordNotFound(what) => {
                format!("{} no longer exists in the library.", what)
            }
            _ => self.to_string(),
        }
    }
}
