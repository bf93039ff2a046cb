//! Client configuration
//!
//! Values come from defaults, then an optional TOML file, then `KITHAB_*`
//! environment variables. Front-ends may override again from their own flags.

use kithab_core::{PortalError, PortalResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "kithab.toml";

pub const ENV_BACKEND_URL: &str = "KITHAB_BACKEND_URL";
pub const ENV_ADMIN_ID: &str = "KITHAB_ADMIN_ID";
pub const ENV_SESSION_PATH: &str = "KITHAB_SESSION_PATH";
pub const ENV_DOWNLOAD_POLICY: &str = "KITHAB_DOWNLOAD_POLICY";

/// What "download all" does when one note fails to download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownloadPolicy {
    /// Abort and produce no archive
    #[default]
    AllOrNothing,
    /// Skip the failed note and report it
    PerItem,
}

impl FromStr for DownloadPolicy {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "all-or-nothing" => Ok(Self::AllOrNothing),
            "per-item" => Ok(Self::PerItem),
            other => Err(PortalError::InvalidConfig(format!(
                "unknown download policy '{}' (expected all-or-nothing or per-item)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DownloadPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllOrNothing => write!(f, "all-or-nothing"),
            Self::PerItem => write!(f, "per-item"),
        }
    }
}

/// Settings shared by the desktop and command-line front-ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend API root, without a trailing slash
    pub backend_url: String,

    /// Login id that routes to the admin endpoint
    pub admin_id: String,

    pub request_timeout_secs: u64,

    /// Where the login session is persisted
    pub session_path: PathBuf,

    pub download_policy: DownloadPolicy,

    /// File name used for "download all"
    pub archive_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000/api".to_string(),
            admin_id: "admin".to_string(),
            request_timeout_secs: 30,
            session_path: default_session_path(),
            download_policy: DownloadPolicy::default(),
            archive_name: "All_Notes.zip".to_string(),
        }
    }
}

fn default_session_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kithab")
        .join("session.json")
}

impl ClientConfig {
    /// Load from an explicit file, or from `kithab.toml` when it exists,
    /// then apply environment overrides
    pub fn load(path: Option<&Path>) -> PortalResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a TOML file
    pub fn from_file(path: &Path) -> PortalResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PortalError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> PortalResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| PortalError::InvalidConfig(e.to_string()))?;
        config.normalized()
    }

    /// Apply `KITHAB_*` overrides through a lookup function
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> PortalResult<Self> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.backend_url = url;
        }
        if let Some(admin_id) = lookup(ENV_ADMIN_ID) {
            self.admin_id = admin_id;
        }
        if let Some(path) = lookup(ENV_SESSION_PATH) {
            self.session_path = PathBuf::from(path);
        }
        if let Some(policy) = lookup(ENV_DOWNLOAD_POLICY) {
            self.download_policy = policy.parse()?;
        }
        self.normalized()
    }

    /// Replace the backend URL
    pub fn with_backend_url(mut self, url: impl Into<String>) -> PortalResult<Self> {
        self.backend_url = url.into();
        self.normalized()
    }

    /// Trim values and check what must not be empty
    fn normalized(mut self) -> PortalResult<Self> {
        self.backend_url = self.backend_url.trim().trim_end_matches('/').to_string();
        self.admin_id = self.admin_id.trim().to_string();
        if self.backend_url.is_empty() {
            return Err(PortalError::MissingConfig("backend_url".to_string()));
        }
        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            return Err(PortalError::InvalidConfig(format!(
                "backend_url must start with http:// or https://, got '{}'",
                self.backend_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(PortalError::InvalidConfig(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.archive_name.trim().is_empty() {
            self.archive_name = Self::default().archive_name;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.backend_url, "http://localhost:5000/api");
        assert_eq!(config.download_policy, DownloadPolicy::AllOrNothing);
        assert_eq!(config.archive_name, "All_Notes.zip");
    }

    #[test]
    fn test_toml_partial_and_trailing_slash() {
        let config = ClientConfig::from_toml_str(
            r#"
            backend_url = "https://notes.example.edu/api/"
            download_policy = "per-item"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend_url, "https://notes.example.edu/api");
        assert_eq!(config.download_policy, DownloadPolicy::PerItem);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BACKEND_URL, "http://10.0.0.5:5000/api//"),
            (ENV_ADMIN_ID, " ADMIN01 "),
            (ENV_DOWNLOAD_POLICY, "PER_ITEM"),
            (ENV_SESSION_PATH, ""),
        ]);
        let config = ClientConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.5:5000/api");
        assert_eq!(config.admin_id, "ADMIN01");
        assert_eq!(config.download_policy, DownloadPolicy::PerItem);
        assert_eq!(config.session_path, ClientConfig::default().session_path);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ClientConfig::from_toml_str("backend_url = \"ftp://x\"").is_err());
        assert!(ClientConfig::from_toml_str("request_timeout_secs = 0").is_err());
        assert!("sometimes".parse::<DownloadPolicy>().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kithab.toml");
        std::fs::write(&path, "admin_id = \"root\"\narchive_name = \"R2021.zip\"\n").unwrap();
        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.admin_id, "root");
        assert_eq!(config.archive_name, "R2021.zip");
    }
}
