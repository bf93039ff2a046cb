//! Per-invocation state: configuration, the stored session and an API client

use anyhow::{Context as _, Result, anyhow};
use kithab_client::{ActiveSession, ApiClient, ClientConfig, ClientError, ClientResult, Session};
use kithab_core::Role;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::cli::GlobalArgs;

/// Everything a command needs to talk to the backend
pub struct Context {
    pub config: ClientConfig,
    pub session: Session,
    pub api: ApiClient,
}

impl Context {
    /// Load configuration, apply `--backend`, and restore the session
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let mut config = ClientConfig::load(global.config.as_deref())
            .context("Failed to load configuration")?;
        if let Some(url) = &global.backend {
            config = config.with_backend_url(url.as_str())?;
        }
        debug!(backend = %config.backend_url, session = %config.session_path.display(), "configuration loaded");

        let session = Session::init(&config.session_path);
        let mut api = ApiClient::new(&config)?;
        session.authorize(&mut api);
        Ok(Self {
            config,
            session,
            api,
        })
    }

    /// The signed-in account, whatever its role
    pub fn require_login(&self) -> Result<&ActiveSession> {
        self.session
            .active()
            .ok_or_else(|| anyhow!(kithab_core::PortalError::NotAuthenticated))
    }

    /// The signed-in account, provided it has `role`
    pub fn require_role(&self, role: Role) -> Result<&ActiveSession> {
        Ok(self.session.require_role(role)?)
    }

    /// Unwrap a backend result for display. A 401 clears the stored session
    /// before the error is reported.
    pub fn settle<T>(&mut self, result: ClientResult<T>, fallback: &str) -> Result<T> {
        self.session
            .guard(result)
            .map_err(|e| describe(&e, fallback))
    }
}

/// Turn a client error into the message a user should see
pub fn describe(error: &ClientError, fallback: &str) -> anyhow::Error {
    debug!(error = %error, "request failed");
    anyhow!(error.user_message(fallback))
}

/// Ask on stdin; only a literal `yes` (or `y`) confirms
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    eprint!("{} [y/N]: ", prompt);
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Read one line from stdin, for passwords not given as flags
pub fn read_line(prompt: &str) -> Result<String> {
    eprint!("{}: ", prompt);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
