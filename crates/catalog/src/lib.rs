//! # Kithab Catalog
//!
//! The portal's data model and the pure logic every screen shares.
//!
//! - **Records**: `Regulation`, `Branch`, `Subject`, `Note`, `User`, decoded
//!   from whatever shape the backend sends into canonical ids (`wire`)
//! - **Catalog**: the metadata cache and its cascade queries
//! - **Cascade**: the `Selection` reducer behind every
//!   regulation → branch → semester → subject filter
//! - **Validation**: create/update guards with per-field messages
//!
//! Nothing in this crate performs IO.

pub mod branch;
pub mod cascade;
pub mod catalog;
pub mod note;
pub mod regulation;
pub mod subject;
pub mod user;
pub mod validation;
pub mod wire;

pub use branch::Branch;
pub use cascade::{CascadeOptions, Selection, SelectionEvent};
pub use catalog::{Catalog, DeleteImpact};
pub use note::{Note, NoteFilter};
pub use regulation::Regulation;
pub use subject::Subject;
pub use user::User;
pub use validation::{
    BranchDraft, BranchPayload, RegulationDraft, RegulationPayload, SubjectDraft, SubjectPayload,
};
pub use wire::{Embedded, decode_list};

/// Common imports for front-ends
pub mod prelude {
    pub use crate::{
        Branch, BranchDraft, Catalog, Note, NoteFilter, Regulation, RegulationDraft, Selection,
        SelectionEvent, Subject, SubjectDraft, User,
    };
    pub use kithab_core::{
        BranchId, FieldErrors, NoteId, RegulationId, Role, Semester, SubjectId, UserId,
    };
}
