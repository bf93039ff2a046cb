//! # UI Components
//!
//! Reusable Dioxus components for the Kithab screens:
//! - **Inputs**: Text inputs, selects and inline banners
//! - **Cascade Filter**: Regulation → branch → semester → subject selects
//! - **Notes Table**: Note listing with per-row actions
//! - **Dialogs**: Taxonomy and user editors, delete confirmation
//!
//! ## Component Hierarchy
//!
//! ```text
//! Page
//! ├── CascadeFilter
//! │   └── Select (x4)
//! └── NotesTable
//!
//! DialogOverlay
//! ├── RegulationDialog / BranchDialog / SubjectDialog
//! ├── UserDialog
//! └── ConfirmDeleteDialog
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod cascade_filter;
pub mod dialogs;
pub mod inputs;
pub mod notes_table;

// ============================================================================
// Re-exports
// ============================================================================

pub use cascade_filter::CascadeFilter;
pub use inputs::{Banner, Select, SelectOption, TextInput};
pub use notes_table::{NoteRow, NotesTable};

pub use dialogs::{
    BranchDialog, BranchDialogMode, ConfirmDeleteDialog, RegulationDialog, RegulationDialogMode,
    SubjectDialog, SubjectDialogMode, UserDialog,
};
