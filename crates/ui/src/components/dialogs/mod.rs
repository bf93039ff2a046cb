//! # Dialog Components
//!
//! Modal dialogs rendered by the application's dialog overlay.
//!
//! ## Dialogs
//!
//! - **RegulationDialog**, **BranchDialog**, **SubjectDialog**: create and
//!   edit the taxonomy, checked against the loaded catalog first
//! - **UserDialog**: edit a student or faculty account
//! - **ConfirmDeleteDialog**: confirmation for every delete
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kithab_ui::components::dialogs::{BranchDialog, BranchDialogMode};
//!
//! fn MyComponent() -> Element {
//!     rsx! {
//!         BranchDialog { mode: BranchDialogMode::Create }
//!     }
//! }
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod branch_dialog;
pub mod confirm_delete;
pub mod regulation_dialog;
pub mod subject_dialog;
pub mod user_dialog;

// ============================================================================
// Re-exports
// ============================================================================

pub use branch_dialog::{BranchDialog, BranchDialogMode};
pub use confirm_delete::{ConfirmDeleteDialog, DeleteInfo};
pub use regulation_dialog::{RegulationDialog, RegulationDialogMode};
pub use subject_dialog::{SubjectDialog, SubjectDialogMode};
pub use user_dialog::UserDialog;
