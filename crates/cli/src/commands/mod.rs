//! Command implementations
//!
//! Each handler loads a [`Context`](crate::Context) only once its local
//! input checks have passed, so malformed invocations never touch the
//! session file or the network.

pub mod admin;
pub mod auth;
pub mod meta;
pub mod notes;

use anyhow::{Result, anyhow};
use kithab_client::ClientError;
use kithab_core::{FieldErrors, PortalError};

use crate::cli::{Cli, Command};

/// Run a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Command::Login { id, password } => auth::login(&global, &id, password).await,
        Command::Logout => auth::logout(&global),
        Command::Whoami => auth::whoami(&global),
        Command::Register(args) => auth::register(&global, args).await,
        Command::ForgotPassword { email } => auth::forgot_password(&global, &email).await,
        Command::ResetPassword {
            token,
            password,
            confirm,
        } => auth::reset_password(&global, &token, password, confirm).await,
        Command::Meta { command } => meta::run(&global, command).await,
        Command::Notes { command } => notes::run(&global, command).await,
        Command::Admin { command } => admin::run(&global, command).await,
    }
}

/// A local failure, worded the way the desktop client words it
pub(crate) fn local(error: PortalError) -> anyhow::Error {
    anyhow!(ClientError::from(error).user_message("Something went wrong"))
}

/// Every field message of a failed form, one per line
pub(crate) fn field_report(errors: &FieldErrors) -> anyhow::Error {
    let lines: Vec<String> = errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect();
    anyhow!(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_error_wording() {
        assert_eq!(
            local(PortalError::IncompleteSelection).to_string(),
            "Please select all fields"
        );
        assert_eq!(
            local(PortalError::validation("ID and password required")).to_string(),
            "ID and password required"
        );
    }

    #[test]
    fn test_field_report() {
        let errors = FieldErrors::new()
            .with("email", "Invalid email format")
            .with("name", "Full name is required");
        assert_eq!(
            field_report(&errors).to_string(),
            "email: Invalid email format\nname: Full name is required"
        );
    }
}
