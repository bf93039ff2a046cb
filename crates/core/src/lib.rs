//! # Kithab Core
//!
//! Core types, traits, and error handling for the Kithab notes portal.
//!
//! This crate provides the foundational building blocks shared by the
//! catalog, the REST client and both front-ends:
//!
//! - **Types**: Canonical identifiers (`RegulationId`, `BranchId`, ...) and roles
//! - **Traits**: Common behaviors like `Validatable` and `Persistable`
//! - **Errors**: Unified error handling with `PortalError`, `PortalResult`
//!   and per-field form errors (`FieldErrors`)
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{FieldErrors, PortalError, PortalResult};
pub use traits::{Identified, Persistable, Validatable};
pub use types::{BranchId, NoteId, RegulationId, Role, Semester, SubjectId, UserId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
