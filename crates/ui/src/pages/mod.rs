//! Page Components for Kithab
//!
//! Each page is one screen of the portal. Which pages a user can reach
//! depends on their role; see [`crate::state::Page::for_role`].
//!
//! ## Available Pages
//!
//! - **LoginPage**, **RegisterPage**, **ForgotPasswordPage**,
//!   **ResetPasswordPage**: account screens, open to everyone
//! - **StudentNotesPage**: note search and download for students
//! - **FacultyUploadPage**: note upload and upload history for faculty
//! - **AdminMetaPage**: regulation, branch and subject manager
//! - **AdminNotesPage**: every uploaded note, with uploader details
//! - **AdminUsersPage**: student and faculty accounts

pub mod admin_meta;
pub mod admin_notes;
pub mod admin_users;
pub mod faculty_upload;
pub mod login;
pub mod password_reset;
pub mod register;
pub mod student_notes;

// Re-export page components for convenience
pub use admin_meta::AdminMetaPage;
pub use admin_notes::AdminNotesPage;
pub use admin_users::AdminUsersPage;
pub use faculty_upload::FacultyUploadPage;
pub use login::LoginPage;
pub use password_reset::{ForgotPasswordPage, ResetPasswordPage};
pub use register::RegisterPage;
pub use student_notes::StudentNotesPage;
