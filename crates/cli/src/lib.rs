//! # Kithab CLI
//!
//! Command-line front-end for the Kithab notes portal.
//!
//! Every screen of the desktop client has a command here, built on the same
//! client crate, so both front-ends share one session file and one set of
//! validation rules.
//!
//! ## Commands
//!
//! - `login`, `logout`, `whoami` - Session management
//! - `register`, `forgot-password`, `reset-password` - Account recovery
//! - `meta` - Browse regulations, branches and subjects
//! - `notes` - Search, download, upload and delete notes
//! - `admin` - Taxonomy and user administration
//!

pub mod cli;
pub mod commands;
pub mod context;
pub mod output;

pub use cli::Cli;
pub use context::Context;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "kithab_cli");
    }
}
