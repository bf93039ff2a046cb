//! # Kithab Client
//!
//! Everything that talks to the portal backend, shared by the desktop and
//! command-line front-ends.
//!
//! - **Config**: `ClientConfig` from `kithab.toml` and `KITHAB_*` variables
//! - **Api**: `ApiClient`, one typed method per REST endpoint
//! - **Session**: login state with init/teardown and on-disk persistence
//! - **Auth**: login routing and the account forms
//! - **Query**: the note search state machine with its stale-response guard
//! - **Archive**: "download all" into a single zip file
//! - **Upload**: faculty multipart uploads
//!
//! ## Example
//!
//! ```rust,ignore
//! let config = ClientConfig::load(None)?;
//! let mut session = Session::init(&config.session_path);
//! let mut client = ApiClient::new(&config)?;
//! session.authorize(&mut client);
//! let catalog = client.catalog().await?;
//! ```

pub mod api;
pub mod archive;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod query;
pub mod session;
pub mod upload;

pub use api::ApiClient;
pub use archive::{ArchiveReport, ItemOutcome, build_archive, download_to};
pub use auth::{
    ForgotPasswordForm, LoginRequest, LoginResponse, RegisterForm, RegisterRequest,
    ResetPasswordForm, extract_reset_token, route_login,
};
pub use backend::{NoteSource, NotesBackend};
pub use config::{ClientConfig, DownloadPolicy};
pub use error::{ClientError, ClientResult};
pub use query::{NoteQuery, QueryState, QueryTicket, fetch_notes, run_query};
pub use session::{ActiveSession, Session};
pub use upload::{UploadFile, UploadRequest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
