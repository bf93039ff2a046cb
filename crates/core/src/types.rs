//! Core types used throughout the Kithab portal
//!
//! This module contains the canonical identifier types for every catalog
//! entity and the account roles. Backend identifiers are opaque strings;
//! each entity gets its own newtype so a branch id can never be passed where
//! a subject id is expected.

use serde::{Deserialize, Serialize};

// ============================================================================
// Unique Identifiers
// ============================================================================

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a backend identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parse a user-supplied value; blank input means "nothing selected"
            pub fn parse(raw: &str) -> Option<Self> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Self(trimmed.to_string()))
                }
            }

            /// Borrow the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Take the raw identifier
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a regulation (curriculum version)
    RegulationId
);
define_id!(
    /// Identifier of a branch (department/program)
    BranchId
);
define_id!(
    /// Identifier of a subject
    SubjectId
);
define_id!(
    /// Identifier of an uploaded note
    NoteId
);
define_id!(
    /// Identifier of a user account
    UserId
);

/// Semester number, 1-based
pub type Semester = u32;

// ============================================================================
// Roles
// ============================================================================

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Faculty,
    Admin,
}

impl Role {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Faculty => "Faculty",
            Role::Admin => "Admin",
        }
    }

    /// Lowercase name used in URLs and query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
        }
    }

    /// Login endpoint path below `/auth`
    pub fn login_path(&self) -> &'static str {
        match self {
            Role::Student => "student/login",
            Role::Faculty => "faculty/login",
            Role::Admin => "admin/login",
        }
    }

    /// Body field that carries the login identifier
    pub fn id_field(&self) -> &'static str {
        match self {
            Role::Student => "rollNumber",
            Role::Faculty => "employeeId",
            Role::Admin => "adminId",
        }
    }

    /// Get all roles
    pub fn all() -> &'static [Role] {
        &[Role::Student, Role::Faculty, Role::Admin]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" | "students" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
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
    fn test_id_parse_blank_is_none() {
        assert_eq!(RegulationId::parse(""), None);
        assert_eq!(RegulationId::parse("   "), None);
        assert_eq!(RegulationId::parse(" r1 "), Some(RegulationId::new("r1")));
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = BranchId::new("b1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"b1\"");
        let back: BranchId = serde_json::from_str("\"b1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(SubjectId::from("s7").to_string(), "s7");
        assert_eq!(NoteId::from("n1".to_string()).as_str(), "n1");
    }

    #[test]
    fn test_role_paths() {
        assert_eq!(Role::Admin.login_path(), "admin/login");
        assert_eq!(Role::Faculty.id_field(), "employeeId");
        assert_eq!(Role::Student.id_field(), "rollNumber");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Faculty".parse::<Role>(), Ok(Role::Faculty));
        assert_eq!("students".parse::<Role>(), Ok(Role::Student));
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"faculty\"").unwrap();
        assert_eq!(role, Role::Faculty);
    }
}
