//! Core traits for the Kithab portal
//!
//! This module defines the traits that catalog records, form drafts and
//! persisted client state implement to provide consistent behavior for
//! validation, identification and persistence.

use crate::error::{FieldErrors, PortalError, PortalResult};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for form drafts that can be checked without outside context
///
/// Implementors report every problem as a per-field message; the provided
/// methods turn that into a pass/fail answer.
///
/// # Example
///
/// ```rust,ignore
/// use kithab_core::{FieldErrors, Validatable};
///
/// struct ForgotPassword {
///     email: String,
/// }
///
/// impl Validatable for ForgotPassword {
///     fn field_errors(&self) -> FieldErrors {
///         let mut errors = FieldErrors::new();
///         if self.email.trim().is_empty() {
///             errors.insert("email", "Email is required");
///         }
///         errors
///     }
/// }
/// ```
pub trait Validatable {
    /// Collect every field problem
    fn field_errors(&self) -> FieldErrors;

    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or `PortalError::Form` with all messages.
    fn validate(&self) -> PortalResult<()> {
        self.field_errors().into_result()
    }

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        !self.field_errors().has_field_errors()
    }

    /// Get all validation messages as display strings
    fn validation_errors(&self) -> Vec<String> {
        self.field_errors()
            .iter()
            .map(|(_, msg)| msg.to_string())
            .collect()
    }
}

// ============================================================================
// Persistable Trait
// ============================================================================

/// Trait for types that can be serialized to and deserialized from files
///
/// Used for client state that survives restarts, such as the login session.
///
/// # Example
///
/// ```rust,ignore
/// use kithab_core::Persistable;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Stored {
///     token: String,
/// }
///
/// impl Persistable for Stored {
///     fn file_extension() -> &'static str {
///         "json"
///     }
/// }
/// ```
pub trait Persistable: Serialize + DeserializeOwned + Sized {
    /// Get the file extension for this type (without the dot)
    fn file_extension() -> &'static str;

    /// Get the schema version for migration purposes
    fn schema_version() -> u32 {
        1
    }

    /// Save to a JSON string
    fn to_json(&self) -> PortalResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Load from a JSON string
    fn from_json(json: &str) -> PortalResult<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Save to a file, creating the parent directory when needed
    fn save_to_file(&self, path: &Path) -> PortalResult<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| PortalError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }
        }
        std::fs::write(path, json).map_err(|e| PortalError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from a file
    fn load_from_file(path: &Path) -> PortalResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| PortalError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Remove a previously saved file; a missing file is not an error
    fn remove_file(path: &Path) -> PortalResult<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortalError::FileWrite {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }
}

// ============================================================================
// Identified Trait
// ============================================================================

/// Trait for records that carry a backend identifier
pub trait Identified {
    /// Identifier type of the record
    type Id: PartialEq + Clone;

    /// Get the unique identifier
    fn id(&self) -> &Self::Id;

    /// Check if this matches another identifier
    fn matches_id(&self, id: &Self::Id) -> bool {
        self.id() == id
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct TestDraft {
        email: String,
    }

    impl Validatable for TestDraft {
        fn field_errors(&self) -> FieldErrors {
            let mut errors = FieldErrors::new();
            if self.email.trim().is_empty() {
                errors.insert("email", "Email is required");
            }
            errors
        }
    }

    #[test]
    fn test_validatable_trait() {
        let valid = TestDraft {
            email: "a@b.co".to_string(),
        };
        assert!(valid.is_valid());
        assert!(valid.validate().is_ok());
        assert!(valid.validation_errors().is_empty());

        let invalid = TestDraft {
            email: "  ".to_string(),
        };
        assert!(!invalid.is_valid());
        assert_eq!(invalid.validation_errors(), vec!["Email is required"]);
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stored {
        token: String,
    }

    impl Persistable for Stored {
        fn file_extension() -> &'static str {
            "json"
        }
    }

    #[test]
    fn test_persistable_roundtrip_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stored.json");
        let value = Stored {
            token: "abc".to_string(),
        };
        value.save_to_file(&path).unwrap();
        assert_eq!(Stored::load_from_file(&path).unwrap(), value);

        Stored::remove_file(&path).unwrap();
        assert!(!path.exists());
        // Removing twice is fine
        Stored::remove_file(&path).unwrap();
    }
}
