//! Application State Management for Kithab
//!
//! This module provides centralized state management using Dioxus 0.7 Signals.
//! It holds the configuration, the login session, the HTTP client, the
//! metadata cache of the current screen and the UI state (page, dialog,
//! status banner).
//!
//! Every backend result passes through [`AppState::settle`], which is where
//! a `401` from any screen tears the session down and returns to login.

use dioxus::prelude::*;
use kithab_catalog::{Catalog, User};
use kithab_client::{ApiClient, ClientConfig, ClientResult, LoginResponse, Session};
use kithab_core::{
    BranchId, NoteId, PortalError, PortalResult, RegulationId, Role, SubjectId, UserId,
};
use tracing::{error, info, warn};

// ============================================================================
// Page Navigation
// ============================================================================

/// Application pages/views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// Login form
    #[default]
    Login,
    /// Student self-registration
    Register,
    /// Request a password reset email
    ForgotPassword,
    /// Set a new password with the emailed token
    ResetPassword,
    /// Student note search and download
    StudentNotes,
    /// Faculty upload form and upload history
    FacultyUpload,
    /// Regulation, branch and subject manager
    AdminMeta,
    /// All uploaded notes
    AdminNotes,
    /// Student and faculty accounts
    AdminUsers,
}

impl Page {
    /// Get the display name for this page
    pub fn display_name(&self) -> &'static str {
        match self {
            Page::Login => "Login",
            Page::Register => "Register",
            Page::ForgotPassword => "Forgot Password",
            Page::ResetPassword => "Reset Password",
            Page::StudentNotes => "Find Notes",
            Page::FacultyUpload => "Upload Notes",
            Page::AdminMeta => "Regulations & Subjects",
            Page::AdminNotes => "Notes",
            Page::AdminUsers => "Users",
        }
    }

    /// Get the icon emoji for this page (for UI display)
    pub fn icon(&self) -> &'static str {
        match self {
            Page::Login => "🔑",
            Page::Register => "📝",
            Page::ForgotPassword | Page::ResetPassword => "✉️",
            Page::StudentNotes => "📚",
            Page::FacultyUpload => "📤",
            Page::AdminMeta => "🗂️",
            Page::AdminNotes => "📄",
            Page::AdminUsers => "👥",
        }
    }

    /// Role a user must hold to open this page
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Page::StudentNotes => Some(Role::Student),
            Page::FacultyUpload => Some(Role::Faculty),
            Page::AdminMeta | Page::AdminNotes | Page::AdminUsers => Some(Role::Admin),
            Page::Login | Page::Register | Page::ForgotPassword | Page::ResetPassword => None,
        }
    }

    /// Landing page after login
    pub fn home(role: Role) -> Page {
        match role {
            Role::Student => Page::StudentNotes,
            Role::Faculty => Page::FacultyUpload,
            Role::Admin => Page::AdminMeta,
        }
    }

    /// Sidebar entries for a role
    pub fn for_role(role: Role) -> &'static [Page] {
        match role {
            Role::Student => &[Page::StudentNotes],
            Role::Faculty => &[Page::FacultyUpload],
            Role::Admin => &[Page::AdminMeta, Page::AdminNotes, Page::AdminUsers],
        }
    }
}

// ============================================================================
// UI State
// ============================================================================

/// General UI state (page, dialogs, banner)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Currently active page
    pub active_page: Page,
    /// Active dialog (if any)
    pub active_dialog: Option<Dialog>,
    /// Status bar message
    pub status_message: Option<StatusMessage>,
    /// Bumped after every successful mutation; pages refetch when it moves
    pub revision: u64,
}

impl UiState {
    /// Create new UI state
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to a page
    pub fn navigate(&mut self, page: Page) {
        self.active_page = page;
    }

    /// Show a dialog
    pub fn show_dialog(&mut self, dialog: Dialog) {
        self.active_dialog = Some(dialog);
    }

    /// Close the current dialog
    pub fn close_dialog(&mut self) {
        self.active_dialog = None;
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>, level: StatusLevel) {
        self.status_message = Some(StatusMessage {
            text: message.into(),
            level,
        });
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Mark server data as changed
    pub fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Dialog types
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    NewRegulation,
    EditRegulation(RegulationId),
    NewBranch,
    EditBranch(BranchId),
    NewSubject,
    EditSubject(SubjectId),
    /// Edit a user's raw field map
    EditUser(User),
    /// Delete confirmation dialog
    ConfirmDelete(DeleteTarget),
}

/// Target for delete confirmation
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
    Regulation(RegulationId),
    Branch(BranchId),
    Subject(SubjectId),
    Note { id: NoteId, title: String },
    User { id: UserId, name: String },
}

impl DeleteTarget {
    /// Kind of record, for dialog text
    pub fn kind(&self) -> &'static str {
        match self {
            DeleteTarget::Regulation(_) => "Regulation",
            DeleteTarget::Branch(_) => "Branch",
            DeleteTarget::Subject(_) => "Subject",
            DeleteTarget::Note { .. } => "Note",
            DeleteTarget::User { .. } => "User",
        }
    }

    /// Banner text when the backend fails without a message
    pub fn failure_message(&self) -> &'static str {
        match self {
            DeleteTarget::Regulation(_) => "Failed to delete regulation",
            DeleteTarget::Branch(_) => "Failed to delete branch",
            DeleteTarget::Subject(_) => "Failed to delete subject",
            DeleteTarget::Note { .. } => "Failed to delete note",
            DeleteTarget::User { .. } => "Delete failed",
        }
    }
}

/// Status message for the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

/// Status message severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

// ============================================================================
// Application State
// ============================================================================

/// Main application state container
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: ClientConfig,
    /// Login session, persisted across restarts
    pub session: Session,
    /// HTTP client without a token; see [`AppState::api`]
    client: Option<ApiClient>,
    /// Metadata fetched by the current screen
    pub catalog: Catalog,
    /// UI state
    pub ui: UiState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_session(ClientConfig::default(), Session::in_memory())
    }
}

impl AppState {
    /// Load configuration and the stored session
    pub fn new() -> Self {
        let config = ClientConfig::load(None).unwrap_or_else(|e| {
            warn!(error = %e, "invalid configuration, using defaults");
            ClientConfig::default()
        });
        let session = Session::init(config.session_path.clone());
        Self::with_session(config, session)
    }

    /// Build state around an existing session; a restored session opens
    /// its role's home page
    pub fn with_session(config: ClientConfig, session: Session) -> Self {
        let client = match ApiClient::new(&config) {
            Ok(client) => Some(client),
            Err(e) => {
                error!(error = %e, "failed to build HTTP client");
                None
            }
        };
        let mut ui = UiState::new();
        if let Some(role) = session.role() {
            ui.navigate(Page::home(role));
        }
        Self {
            config,
            session,
            client,
            catalog: Catalog::default(),
            ui,
        }
    }

    /// A client carrying the current token
    pub fn api(&self) -> ClientResult<ApiClient> {
        let mut client = self
            .client
            .clone()
            .ok_or_else(|| PortalError::internal("HTTP client unavailable"))?;
        self.session.authorize(&mut client);
        Ok(client)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.role()
    }

    /// Navigate, sending users without the page's role to login
    pub fn navigate(&mut self, page: Page) {
        let Some(role) = page.required_role() else {
            self.ui.navigate(page);
            return;
        };
        match self.session.require_role(role) {
            Ok(_) => self.ui.navigate(page),
            Err(e) => {
                warn!(page = page.display_name(), error = %e, "page access denied");
                if self.session.is_authenticated() {
                    self.ui.set_status(e.to_string(), StatusLevel::Warning);
                }
                self.ui.navigate(Page::Login);
            }
        }
    }

    /// Start a session and open the role's home page
    pub fn establish(&mut self, response: LoginResponse) -> PortalResult<()> {
        self.session.establish(response)?;
        let role = self.session.role().unwrap_or_default();
        self.catalog = Catalog::default();
        self.ui.clear_status();
        self.navigate(Page::home(role));
        Ok(())
    }

    /// End the session and return to login
    pub fn logout(&mut self) {
        if let Err(e) = self.session.teardown() {
            warn!(error = %e, "failed to clear stored session");
        }
        self.catalog = Catalog::default();
        self.ui.close_dialog();
        self.ui.navigate(Page::Login);
    }

    /// Unwrap a backend result for a screen.
    ///
    /// Failures become the status banner (the server's message, else
    /// `fallback`). A `401` additionally ends the session and returns to
    /// login, whichever screen made the call.
    pub fn settle<T>(&mut self, result: ClientResult<T>, fallback: &str) -> Option<T> {
        match self.session.guard(result) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "{}", fallback);
                if e.is_unauthorized() {
                    self.catalog = Catalog::default();
                    self.ui.close_dialog();
                    self.ui.navigate(Page::Login);
                }
                self.ui.set_status(e.user_message(fallback), StatusLevel::Error);
                None
            }
        }
    }

    /// Get window title
    pub fn window_title(&self) -> String {
        match self.session.user() {
            Some(user) => format!("{} - {} - Kithab", self.ui.active_page.display_name(), user.name),
            None => format!("{} - Kithab", self.ui.active_page.display_name()),
        }
    }
}

// ============================================================================
// Global State Context
// ============================================================================

/// Global application state signal
/// Use this in components to access and modify app state
pub static APP_STATE: GlobalSignal<AppState> = Signal::global(AppState::new);

/// A token-carrying client, read without subscribing the caller
pub fn api_client() -> ClientResult<ApiClient> {
    APP_STATE.peek().api()
}

/// [`AppState::settle`] on the global state
pub fn settle<T>(result: ClientResult<T>, fallback: &str) -> Option<T> {
    APP_STATE.write().settle(result, fallback)
}

/// Show a banner message
pub fn notify(message: impl Into<String>, level: StatusLevel) {
    APP_STATE.write().ui.set_status(message, level);
}

/// Record a successful mutation: banner, close dialog, refetch
pub fn mutation_done(message: impl Into<String>) {
    let mut state = APP_STATE.write();
    state.ui.close_dialog();
    state.ui.bump_revision();
    state.ui.set_status(message, StatusLevel::Success);
    info!(revision = state.ui.revision, "data changed");
}

// ============================================================================
// State Hooks (for component use)
// ============================================================================

/// Hook to access the current page
pub fn use_current_page() -> Page {
    APP_STATE.read().ui.active_page
}

/// Hook to watch the data revision. The memo only notifies when the
/// revision moves, so resources keyed on it refetch after mutations and
/// nothing else.
pub fn use_revision() -> Memo<u64> {
    use_memo(|| APP_STATE.read().ui.revision)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kithab_client::ClientError;

    fn login(role: Role) -> LoginResponse {
        LoginResponse {
            token: "jwt".to_string(),
            user: User::new("u1", "Asha").with_role(role),
        }
    }

    #[test]
    fn test_page_roles() {
        assert_eq!(Page::Login.required_role(), None);
        assert_eq!(Page::ResetPassword.required_role(), None);
        assert_eq!(Page::FacultyUpload.required_role(), Some(Role::Faculty));
        assert_eq!(Page::AdminUsers.required_role(), Some(Role::Admin));
        for role in Role::all() {
            let home = Page::home(*role);
            assert_eq!(home.required_role(), Some(*role));
            assert!(Page::for_role(*role).contains(&home));
        }
    }

    #[test]
    fn test_ui_state() {
        let mut ui = UiState::new();
        assert_eq!(ui.active_page, Page::Login);

        ui.show_dialog(Dialog::NewRegulation);
        assert!(ui.active_dialog.is_some());
        ui.close_dialog();
        assert!(ui.active_dialog.is_none());

        ui.bump_revision();
        assert_eq!(ui.revision, 1);
    }

    #[test]
    fn test_gated_pages_need_matching_role() {
        let mut state = AppState::default();
        state.navigate(Page::AdminMeta);
        assert_eq!(state.ui.active_page, Page::Login);
        assert!(state.ui.status_message.is_none());

        state.establish(login(Role::Faculty)).unwrap();
        assert_eq!(state.ui.active_page, Page::FacultyUpload);

        state.navigate(Page::AdminMeta);
        assert_eq!(state.ui.active_page, Page::Login);
        assert_eq!(
            state.ui.status_message.as_ref().map(|m| m.level),
            Some(StatusLevel::Warning)
        );
    }

    #[test]
    fn test_restored_session_opens_home() {
        let mut session = Session::in_memory();
        session.establish(login(Role::Admin)).unwrap();
        let state = AppState::with_session(ClientConfig::default(), session);
        assert_eq!(state.ui.active_page, Page::AdminMeta);
        assert!(state.api().unwrap().has_token());
    }

    #[test]
    fn test_settle_unauthorized_logs_out() {
        let mut state = AppState::default();
        state.establish(login(Role::Student)).unwrap();
        state.ui.show_dialog(Dialog::NewBranch);

        let result: ClientResult<()> = Err(ClientError::from_status(401, None));
        assert!(state.settle(result, "Failed to fetch notes").is_none());
        assert!(!state.is_authenticated());
        assert_eq!(state.ui.active_page, Page::Login);
        assert!(state.ui.active_dialog.is_none());
        assert!(!state.api().unwrap().has_token());
    }

    #[test]
    fn test_settle_other_failure_keeps_session() {
        let mut state = AppState::default();
        state.establish(login(Role::Student)).unwrap();

        let result: ClientResult<()> = Err(ClientError::from_status(500, None));
        assert!(state.settle(result, "Failed to fetch notes").is_none());
        assert!(state.is_authenticated());
        assert_eq!(state.ui.active_page, Page::StudentNotes);
        assert_eq!(
            state.ui.status_message,
            Some(StatusMessage {
                text: "Failed to fetch notes".to_string(),
                level: StatusLevel::Error,
            })
        );
        assert_eq!(state.settle(Ok(7), "unused"), Some(7));
    }

    #[test]
    fn test_logout() {
        let mut state = AppState::default();
        state.establish(login(Role::Admin)).unwrap();
        assert!(state.window_title().contains("Asha"));
        state.logout();
        assert!(!state.is_authenticated());
        assert_eq!(state.ui.active_page, Page::Login);
    }

    #[test]
    fn test_delete_target_messages() {
        let target = DeleteTarget::User {
            id: UserId::new("u1"),
            name: "Asha".to_string(),
        };
        assert_eq!(target.kind(), "User");
        assert_eq!(target.failure_message(), "Delete failed");
    }
}
