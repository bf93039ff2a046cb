//! Login session lifecycle
//!
//! A [`Session`] is created once per process with [`Session::init`] and then
//! handed to whatever needs the token. [`Session::teardown`] is the only way
//! out: it forgets the token in memory and removes the persisted file.
//! [`Session::guard`] runs teardown for any unauthorized response, so a
//! `401` from any screen ends the session the same way.

use crate::api::ApiClient;
use crate::auth::LoginResponse;
use crate::error::ClientResult;
use chrono::{DateTime, Utc};
use kithab_catalog::User;
use kithab_core::{Persistable, PortalError, PortalResult, Role, UserId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Current on-disk session format
pub const SESSION_SCHEMA_VERSION: u32 = 1;

/// What survives a restart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Persistable for StoredSession {
    fn file_extension() -> &'static str {
        "json"
    }

    fn schema_version() -> u32 {
        SESSION_SCHEMA_VERSION
    }
}

/// Token and user of the logged-in account
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub token: String,
    pub user: User,
    pub logged_in_at: DateTime<Utc>,
}

impl ActiveSession {
    /// Role of the user; accounts without one are treated as students
    pub fn role(&self) -> Role {
        self.user.role.unwrap_or_default()
    }
}

/// The process-wide login session
#[derive(Debug, Clone, Default)]
pub struct Session {
    path: Option<PathBuf>,
    active: Option<ActiveSession>,
}

impl Session {
    /// A session that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the persisted session, discarding it when the token or the user
    /// is missing or the file is unreadable
    pub fn init(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let active = match Self::load(&path) {
            Ok(active) => active,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding stored session");
                None
            }
        };
        let session = Self {
            path: Some(path),
            active,
        };
        if session.active.is_none() {
            if let Some(path) = &session.path {
                if let Err(e) = StoredSession::remove_file(path) {
                    warn!(error = %e, "failed to remove stale session file");
                }
            }
        } else {
            info!(role = %session.role().unwrap_or_default(), "restored session");
        }
        session
    }

    fn load(path: &Path) -> PortalResult<Option<ActiveSession>> {
        if !path.exists() {
            return Ok(None);
        }
        let stored = StoredSession::load_from_file(path)?;
        if stored.schema_version != SESSION_SCHEMA_VERSION {
            return Err(PortalError::SchemaVersionMismatch {
                expected: SESSION_SCHEMA_VERSION,
                found: stored.schema_version,
            });
        }
        Ok(match (stored.token, stored.user) {
            (Some(token), Some(user)) if !token.trim().is_empty() => Some(ActiveSession {
                token,
                user,
                logged_in_at: stored.logged_in_at.unwrap_or_else(Utc::now),
            }),
            _ => None,
        })
    }

    /// Start a session from a successful login and persist it
    pub fn establish(&mut self, response: LoginResponse) -> PortalResult<()> {
        let active = ActiveSession {
            token: response.token,
            user: response.user,
            logged_in_at: Utc::now(),
        };
        if let Some(path) = &self.path {
            StoredSession {
                schema_version: SESSION_SCHEMA_VERSION,
                token: Some(active.token.clone()),
                user: Some(active.user.clone()),
                logged_in_at: Some(active.logged_in_at),
            }
            .save_to_file(path)?;
        }
        info!(role = %active.role(), user = %active.user.name, "logged in");
        self.active = Some(active);
        Ok(())
    }

    /// Forget the session in memory and on disk
    pub fn teardown(&mut self) -> PortalResult<()> {
        if self.active.take().is_some() {
            info!("logged out");
        }
        match &self.path {
            Some(path) => StoredSession::remove_file(path),
            None => Ok(()),
        }
    }

    /// Pass a result through, tearing the session down on a 401
    pub fn guard<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                warn!(error = %e, "session rejected by backend");
                if let Err(clear) = self.teardown() {
                    warn!(error = %clear, "failed to clear session");
                }
            }
        }
        result
    }

    pub fn is_authenticated(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.active.as_ref().map(|a| &a.user)
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user().map(|u| &u.id)
    }

    pub fn role(&self) -> Option<Role> {
        self.active.as_ref().map(ActiveSession::role)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The active session, provided the user has `role`
    pub fn require_role(&self, role: Role) -> PortalResult<&ActiveSession> {
        let active = self.active.as_ref().ok_or(PortalError::NotAuthenticated)?;
        if active.role() != role {
            return Err(PortalError::Forbidden(role.display_name().to_string()));
        }
        Ok(active)
    }

    /// Copy the token into a client
    pub fn authorize(&self, client: &mut ApiClient) {
        client.set_token(self.token().map(str::to_string));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use pretty_assertions::assert_eq;

    fn login(role: Role) -> LoginResponse {
        LoginResponse {
            token: "jwt-token".to_string(),
            user: User::new("u1", "Asha").with_role(role),
        }
    }

    #[test]
    fn test_establish_persists_and_init_restores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("session.json");

        let mut session = Session::init(&path);
        assert!(!session.is_authenticated());
        session.establish(login(Role::Faculty)).unwrap();
        assert!(path.exists());

        let restored = Session::init(&path);
        assert_eq!(restored.token(), Some("jwt-token"));
        assert_eq!(restored.role(), Some(Role::Faculty));
        assert_eq!(restored.user_id(), Some(&UserId::new("u1")));
    }

    #[test]
    fn test_init_discards_partial_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        StoredSession {
            schema_version: SESSION_SCHEMA_VERSION,
            token: Some("jwt".to_string()),
            user: None,
            logged_in_at: None,
        }
        .save_to_file(&path)
        .unwrap();

        let session = Session::init(&path);
        assert!(!session.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn test_init_discards_garbage_and_old_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(!Session::init(&path).is_authenticated());

        StoredSession {
            schema_version: 0,
            token: Some("jwt".to_string()),
            user: Some(User::new("u1", "Asha")),
            logged_in_at: None,
        }
        .save_to_file(&path)
        .unwrap();
        assert!(!Session::init(&path).is_authenticated());
    }

    #[test]
    fn test_unauthorized_tears_down() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = Session::init(&path);
        session.establish(login(Role::Admin)).unwrap();

        let ok: ClientResult<u32> = Ok(1);
        assert_eq!(session.guard(ok).unwrap(), 1);
        let other: ClientResult<()> = Err(ClientError::from_status(500, None));
        assert!(session.guard(other).is_err());
        assert!(session.is_authenticated());

        let expired: ClientResult<()> = Err(ClientError::from_status(401, None));
        let err = session.guard(expired).unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!session.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn test_require_role() {
        let mut session = Session::in_memory();
        assert!(matches!(
            session.require_role(Role::Faculty),
            Err(PortalError::NotAuthenticated)
        ));
        session.establish(login(Role::Student)).unwrap();
        assert!(matches!(
            session.require_role(Role::Faculty),
            Err(PortalError::Forbidden(_))
        ));
        assert!(session.require_role(Role::Student).is_ok());
        session.teardown().unwrap();
        assert_eq!(session.token(), None);
    }
}
