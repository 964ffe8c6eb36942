//! Error types for the Vigil proctoring core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Vigil workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum VigilError {
    /// Bad or missing input (empty required fields, malformed identifiers)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VigilError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this error indicates a file/entity was not found.
    ///
    /// Returns true for:
    /// - `NotFound` errors
    /// - `Io` errors with "not found" in the message
    ///
    /// This helper centralizes the logic for detecting "not found" conditions
    /// across different error types.
    pub fn is_not_found_or_missing(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io { message } => message.to_lowercase().contains("not found"),
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for VigilError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for VigilError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for VigilError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for VigilError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (repository seams report through anyhow)
impl From<anyhow::Error> for VigilError {
    fn from(err: anyhow::Error) -> Self {
        Self::DataAccess(err.to_string())
    }
}

/// A type alias for `Result<T, VigilError>`.
pub type Result<T> = std::result::Result<T, VigilError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_helpers() {
        let err = VigilError::not_found("session", "abc");
        assert!(err.is_not_found());
        assert!(err.is_not_found_or_missing());
        assert_eq!(err.to_string(), "Entity not found: session 'abc'");
    }

    #[test]
    fn test_io_not_found_detection() {
        let err = VigilError::io("File not found: sessions/x.toml");
        assert!(!err.is_not_found());
        assert!(err.is_not_found_or_missing());
    }

    #[test]
    fn test_validation_message() {
        let err = VigilError::validation("candidateName is required");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: candidateName is required");
    }
}
