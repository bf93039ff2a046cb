//! # Kithab UI
//!
//! Dioxus Desktop UI for the Kithab notes portal.
//!
//! Students search and download notes, faculty upload them, and
//! administrators curate regulations, branches, subjects, notes and user
//! accounts. All data lives on the portal backend; this crate renders it
//! through [`kithab_client`].
//!
//! ## Features
//!
//! - Single login form routed by id to the admin, faculty or student endpoint
//! - Cascading regulation → branch → semester → subject selection
//! - Bulk "Download All" into one zip archive
//! - Taxonomy manager with duplicate checks before anything is sent
//! - Uniform handling of expired sessions on every screen
//!

// ============================================================================
// Modules
// ============================================================================

pub mod actions;
pub mod app;
pub mod components;
pub mod file_ops;
pub mod pages;
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

// Re-export internal crates for convenience
pub use kithab_catalog;
pub use kithab_client;
pub use kithab_core;

// Re-export main components
pub use app::App;
pub use file_ops::{read_upload_files, save_download, show_save_dialog, show_upload_dialog};
pub use pages::{LoginPage, StudentNotesPage};
pub use state::{
    APP_STATE, AppState, DeleteTarget, Dialog, Page, StatusLevel, StatusMessage, UiState,
};

// Re-export components
pub use components::{
    Banner, CascadeFilter, ConfirmDeleteDialog, NotesTable, Select, SelectOption, TextInput,
};

// ============================================================================
// Constants
// ============================================================================

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = "Kithab";

/// Application display title
pub const TITLE: &str = "Kithab - Course Notes Portal";

/// CSS styles for the application, embedded at build time
const STYLES: &str = include_str!("../../../assets/styles/main.css");

// ============================================================================
// Launch Function
// ============================================================================

/// Launch the Kithab desktop application
///
/// Configuration and any stored session are loaded when the UI first reads
/// its state.
///
/// # Example
///
/// ```rust,ignore
/// fn main() {
///     kithab_ui::launch();
/// }
/// ```
pub fn launch() {
    tracing::info!("Starting {} v{}", NAME, VERSION);

    // Build custom head with embedded CSS
    let custom_head = format!(r#"<style type="text/css">{}</style>"#, STYLES);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title(TITLE)
                        .with_resizable(true)
                        .with_inner_size(dioxus::desktop::LogicalSize::new(1200.0, 800.0))
                        .with_min_inner_size(dioxus::desktop::LogicalSize::new(720.0, 520.0)),
                )
                .with_menu(None)
                .with_custom_head(custom_head),
        )
        .launch(App);
}

/// Get the embedded CSS styles
pub fn get_styles() -> &'static str {
    STYLES
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_title() {
        assert_eq!(NAME, "Kithab");
        assert!(TITLE.contains(NAME));
    }

    #[test]
    fn test_styles_loaded() {
        // Every class the components rely on is defined
        for class in [".btn-primary", ".input-error", ".data-table", ".dialog-overlay", ".cascade-filter"] {
            assert!(get_styles().contains(class), "missing {}", class);
        }
    }
}
