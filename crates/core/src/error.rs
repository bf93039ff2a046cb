//! Error types for the Kithab portal
//!
//! This module provides unified error handling across the portal crates,
//! including validation errors, form field errors, IO errors, serialization
//! errors, and missing sessions.

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the Kithab portal
#[derive(Debug, Error)]
pub enum PortalError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A form failed validation; carries every field message
    #[error("Form validation failed: {0}")]
    Form(FieldErrors),

    /// Note query or upload attempted without a complete selection
    #[error("Please select all fields")]
    IncompleteSelection,

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// A catalog record could not be located
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// No session is active for an operation that needs one
    #[error("Not logged in")]
    NotAuthenticated,

    /// The logged-in user lacks the role an operation requires
    #[error("This action requires the {0} role")]
    Forbidden(String),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Persisted file has an unsupported schema version
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: u32, found: u32 },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Operation cancelled by user
    #[error("Operation cancelled")]
    Cancelled,
}

impl PortalError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        PortalError::Validation(msg.into())
    }

    /// Create a not-found error for a catalog kind
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        PortalError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        PortalError::Internal(msg.into())
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PortalError::Validation(_)
                | PortalError::Form(_)
                | PortalError::IncompleteSelection
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortalError::NotFound { .. })
    }

    /// Check if this error means the session must be discarded
    pub fn is_session(&self) -> bool {
        matches!(self, PortalError::NotAuthenticated)
    }

    /// Field errors carried by a form failure, if any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            PortalError::Form(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type alias using PortalError
pub type PortalResult<T> = Result<T, PortalError>;

// ============================================================================
// Field Errors
// ============================================================================

/// Field name used for errors reported by the backend after a submit
pub const SERVER_FIELD: &str = "server";

/// Per-field messages produced by form validation
///
/// Field messages block submission. The `server` slot holds the message the
/// backend returned for a failed create/update/delete and is displayed apart
/// from the inline field messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: BTreeMap<String, String>,
    server: Option<String>,
}

impl FieldErrors {
    /// Create an empty error set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field. The first message for a field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Builder form of [`insert`](FieldErrors::insert)
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(field, message);
        self
    }

    /// Record the backend's message
    pub fn set_server(&mut self, message: impl Into<String>) {
        self.server = Some(message.into());
    }

    /// Drop every message
    pub fn clear(&mut self) {
        self.fields.clear();
        self.server = None;
    }

    /// Message for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Whether a field has a message
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// The backend's message
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    /// Whether any field message blocks submission
    pub fn has_field_errors(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Whether there is nothing to show at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.server.is_none()
    }

    /// Number of field messages
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over `(field, message)` pairs in field-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First field message in field-name order, falling back to the server slot
    pub fn first_message(&self) -> Option<&str> {
        self.fields
            .values()
            .next()
            .map(String::as_str)
            .or(self.server.as_deref())
    }

    /// Convert into a result: `Ok` when no field blocks submission
    pub fn into_result(self) -> PortalResult<()> {
        if self.has_field_errors() {
            Err(PortalError::Form(self))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        if let Some(server) = &self.server {
            parts.push(format!("{}: {}", SERVER_FIELD, server));
        }
        write!(f, "{}", parts.join("; "))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_error() {
        let err = PortalError::validation("Name is required");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn test_incomplete_selection_message() {
        let err = PortalError::IncompleteSelection;
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please select all fields");
    }

    #[test]
    fn test_not_found_error() {
        let err = PortalError::not_found("Regulation", "r9");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Regulation not found: r9");
    }

    #[test]
    fn test_session_errors() {
        assert!(PortalError::NotAuthenticated.is_session());
        assert!(!PortalError::Forbidden("admin".to_string()).is_session());
        assert!(!PortalError::Cancelled.is_session());
    }

    #[test]
    fn test_field_errors_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "Name is required");
        errors.insert("name", "A regulation with this name already exists");
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_field_errors_server_slot_is_separate() {
        let mut errors = FieldErrors::new();
        errors.set_server("Failed to add branch");
        assert!(!errors.has_field_errors());
        assert!(!errors.is_empty());
        assert_eq!(errors.server(), Some("Failed to add branch"));
        assert!(errors.clone().into_result().is_ok());

        errors.insert("code", "Branch code is required");
        assert_eq!(
            errors.to_string(),
            "code: Branch code is required; server: Failed to add branch"
        );
    }

    #[test]
    fn test_field_errors_into_result() {
        let errors = FieldErrors::new().with("semester", "Please select semester");
        let err = errors.into_result().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.field_errors().and_then(|e| e.get("semester")),
            Some("Please select semester")
        );
    }
}
