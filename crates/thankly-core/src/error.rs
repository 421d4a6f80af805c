//! Error types for the Thankly journal.

use thiserror::Error;

/// A shared error type for the whole journal.
///
/// Typed variants cover the domain refusals (read-only, quota, validation)
/// as well as the storage failures surfaced by the persistence seam.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThanklyError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (storage layer)
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

    /// The string cannot be used as an identifier (no separator).
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// A blank display name was offered to the entry flow.
    #[error("Display name must not be empty")]
    EmptyDisplayName,

    /// A blank nickname was offered to the profile editor.
    #[error("Nickname must not be empty")]
    EmptyNickname,

    /// A mutation was attempted on a journal the viewer does not own.
    #[error("Journal '{target}' is read-only for this viewer")]
    ReadOnly { target: String },

    /// The daily entry cap for the viewer's tier has been reached.
    #[error("Daily limit of {limit} appreciations reached")]
    QuotaExceeded { limit: usize },

    /// An entry was submitted without a selected date.
    #[error("An appreciation needs a date")]
    MissingDate,

    /// Both title and text are empty after trimming.
    #[error("An appreciation must not be blank")]
    BlankEntry,

    /// A field exceeds its maximum length (in characters).
    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// The viewer's tier does not include the requested feature.
    #[error("{feature} is not available for {tier} accounts")]
    FeatureUnavailable {
        feature: &'static str,
        tier: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ThanklyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

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

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a ReadOnly error for the given journal.
    pub fn read_only(target: impl Into<String>) -> Self {
        Self::ReadOnly {
            target: target.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a read-only refusal
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly { .. })
    }

    /// Check if this is a quota refusal
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Returns true for refusals caused by user input rather than storage.
    ///
    /// These are shown to the user as a transient notification; everything
    /// else is logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier(_)
                | Self::EmptyDisplayName
                | Self::EmptyNickname
                | Self::ReadOnly { .. }
                | Self::QuotaExceeded { .. }
                | Self::MissingDate
                | Self::BlankEntry
                | Self::TooLong { .. }
                | Self::FeatureUnavailable { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ThanklyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ThanklyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ThanklyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ThanklyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ThanklyError>`.
pub type Result<T> = std::result::Result<T, ThanklyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        assert!(ThanklyError::QuotaExceeded { limit: 5 }.is_user_facing());
        assert!(ThanklyError::read_only("bob-1").is_user_facing());
        assert!(!ThanklyError::io("disk gone").is_user_facing());
        assert!(!ThanklyError::internal("bug").is_user_facing());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: ThanklyError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.is_serialization());
    }
}
