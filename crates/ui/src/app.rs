//! Main Application Component for Kithab
//!
//! This module contains the root Dioxus component that renders the entire
//! application: the toolbar with the signed-in user, the role's navigation
//! sidebar, the active page, the status bar and the dialog overlay.

use dioxus::prelude::*;
use tracing::info;

use crate::components::dialogs::{
    BranchDialog, BranchDialogMode, ConfirmDeleteDialog, RegulationDialog, RegulationDialogMode,
    SubjectDialog, SubjectDialogMode, UserDialog,
};
use crate::pages::{
    AdminMetaPage, AdminNotesPage, AdminUsersPage, FacultyUploadPage, ForgotPasswordPage,
    LoginPage, RegisterPage, ResetPasswordPage, StudentNotesPage,
};
use crate::state::{APP_STATE, Dialog, Page, StatusLevel};

// ============================================================================
// Main App Component
// ============================================================================

/// Root application component
#[component]
pub fn App() -> Element {
    use_effect(|| {
        let state = APP_STATE.peek();
        info!(
            backend = %state.config.backend_url,
            restored = state.is_authenticated(),
            "Kithab UI initialized"
        );
    });

    let window = dioxus::desktop::use_window();
    use_effect(move || {
        let title = APP_STATE.read().window_title();
        window.set_title(&title);
    });

    let authenticated = APP_STATE.read().is_authenticated();

    rsx! {
        div {
            class: "app-container",

            Toolbar {}

            div {
                class: "app-body",

                if authenticated {
                    Sidebar {}
                }

                MainContent {}
            }

            StatusBar {}

            DialogOverlay {}
        }
    }
}

// ============================================================================
// Toolbar Component
// ============================================================================

/// Top toolbar with the signed-in user and logout
#[component]
fn Toolbar() -> Element {
    let state = APP_STATE.read();
    let user = state
        .session
        .user()
        .map(|u| (u.name.clone(), u.role_label().to_string()));
    drop(state);

    rsx! {
        header {
            class: "toolbar",

            div {
                class: "toolbar-brand",
                span { class: "toolbar-logo", "📚" }
                span { class: "toolbar-name", "Kithab" }
            }

            div { class: "spacer" }

            if let Some((name, role)) = user {
                div {
                    class: "toolbar-user",
                    span { class: "muted", "{role}" }
                    strong { "{name}" }
                }
                ToolbarButton {
                    icon: "⎋",
                    label: "Logout",
                    onclick: move |_| {
                        APP_STATE.write().logout();
                        info!("logged out");
                    }
                }
            }
        }
    }
}

/// Toolbar button component
#[component]
fn ToolbarButton(
    icon: &'static str,
    label: &'static str,
    #[props(default = false)] disabled: bool,
    onclick: EventHandler<MouseEvent>,
) -> Element {
    rsx! {
        button {
            class: if disabled { "toolbar-button disabled" } else { "toolbar-button" },
            disabled: disabled,
            title: "{label}",
            onclick: move |e| {
                if !disabled {
                    onclick.call(e);
                }
            },
            span { "{icon}" }
            span { "{label}" }
        }
    }
}

// ============================================================================
// Sidebar Component
// ============================================================================

/// Left navigation with the pages the user's role may open
#[component]
fn Sidebar() -> Element {
    let state = APP_STATE.read();
    let current_page = state.ui.active_page;
    let pages = state.role().map(Page::for_role).unwrap_or_default();
    drop(state);

    rsx! {
        aside {
            class: "sidebar",
            nav {
                for page in pages.iter().copied() {
                    SidebarItem {
                        key: "{page:?}",
                        page: page,
                        current: current_page,
                    }
                }
            }
        }
    }
}

/// Sidebar navigation item
#[component]
fn SidebarItem(page: Page, current: Page) -> Element {
    let is_active = page == current;
    let icon = page.icon();
    let name = page.display_name();

    rsx! {
        button {
            class: if is_active { "sidebar-item active" } else { "sidebar-item" },
            title: "{name}",
            onclick: move |_| {
                APP_STATE.write().navigate(page);
            },
            span { class: "sidebar-icon", "{icon}" }
            span { "{name}" }
        }
    }
}

// ============================================================================
// Main Content Component
// ============================================================================

/// Main content area that renders the current page
#[component]
fn MainContent() -> Element {
    let state = APP_STATE.read();
    let current_page = state.ui.active_page;
    let allowed = match current_page.required_role() {
        Some(role) => state.role() == Some(role),
        None => true,
    };
    drop(state);

    // Pages are gated on navigation too; this covers a session ended under
    // an open page.
    let page = if allowed { current_page } else { Page::Login };

    rsx! {
        main {
            class: "main-content scroll",

            match page {
                Page::Login => rsx! { LoginPage {} },
                Page::Register => rsx! { RegisterPage {} },
                Page::ForgotPassword => rsx! { ForgotPasswordPage {} },
                Page::ResetPassword => rsx! { ResetPasswordPage {} },
                Page::StudentNotes => rsx! { StudentNotesPage {} },
                Page::FacultyUpload => rsx! { FacultyUploadPage {} },
                Page::AdminMeta => rsx! { AdminMetaPage {} },
                Page::AdminNotes => rsx! { AdminNotesPage {} },
                Page::AdminUsers => rsx! { AdminUsersPage {} },
            }
        }
    }
}

// ============================================================================
// Status Bar Component
// ============================================================================

/// Bottom status bar carrying the banner message
#[component]
fn StatusBar() -> Element {
    let state = APP_STATE.read();
    let status = state.ui.status_message.clone();
    let backend = state.config.backend_url.clone();
    drop(state);

    rsx! {
        footer {
            class: "status-bar",

            if let Some(msg) = status {
                span {
                    class: match msg.level {
                        StatusLevel::Info => "status-info",
                        StatusLevel::Success => "status-success",
                        StatusLevel::Warning => "status-warning",
                        StatusLevel::Error => "status-error",
                    },
                    "{msg.text}"
                }
                button {
                    class: "status-dismiss",
                    title: "Dismiss",
                    onclick: move |_| APP_STATE.write().ui.clear_status(),
                    "✕"
                }
            } else {
                span { "Ready" }
            }

            div { class: "spacer" }

            span { class: "muted", "{backend}" }
        }
    }
}

// ============================================================================
// Dialog Overlay Component
// ============================================================================

/// Modal overlay for the active dialog
#[component]
fn DialogOverlay() -> Element {
    let state = APP_STATE.read();
    let dialog = state.ui.active_dialog.clone();
    drop(state);

    let Some(dialog) = dialog else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "dialog-overlay",

            // Backdrop
            div {
                class: "dialog-backdrop",
                onclick: move |_| {
                    APP_STATE.write().ui.close_dialog();
                }
            }

            // Dialog content
            div {
                class: match &dialog {
                    Dialog::EditUser(_) => "dialog-frame dialog-wide",
                    _ => "dialog-frame",
                },
                onclick: move |e| e.stop_propagation(),

                match dialog {
                    Dialog::NewRegulation => rsx! {
                        RegulationDialog { mode: RegulationDialogMode::Create }
                    },
                    Dialog::EditRegulation(id) => rsx! {
                        RegulationDialog { mode: RegulationDialogMode::Edit(id) }
                    },
                    Dialog::NewBranch => rsx! {
                        BranchDialog { mode: BranchDialogMode::Create }
                    },
                    Dialog::EditBranch(id) => rsx! {
                        BranchDialog { mode: BranchDialogMode::Edit(id) }
                    },
                    Dialog::NewSubject => rsx! {
                        SubjectDialog { mode: SubjectDialogMode::Create }
                    },
                    Dialog::EditSubject(id) => rsx! {
                        SubjectDialog { mode: SubjectDialogMode::Edit(id) }
                    },
                    Dialog::EditUser(user) => rsx! {
                        UserDialog { user: user }
                    },
                    Dialog::ConfirmDelete(target) => rsx! {
                        ConfirmDeleteDialog { target: target }
                    },
                }
            }
        }
    }
}
