//! Configuration loading for furqand.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.furqan/config.toml` (user)
//! 3. `/etc/furqan/config.toml` (system)
//!
//! Without any file, built-in defaults apply (public upstream, local bind).
//! `FURQAN_UPSTREAM_URL` overrides the upstream base URL either way.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.furqan/secrets.toml` (user, must be 0600)
//! 2. `/etc/furqan/secrets.toml` (system, must be 0600)
//!
//! Each secret falls back to its environment variable when the file does
//! not set it.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::upstream::{DEFAULT_BASE_URL, UpstreamCredentials};
use crate::{FurqanError, Result};

/// Environment variable overriding `upstream.base_url`.
pub const UPSTREAM_URL_ENV: &str = "FURQAN_UPSTREAM_URL";

/// Environment fallback for the upstream auth token.
pub const UPSTREAM_AUTH_TOKEN_ENV: &str = "FURQAN_UPSTREAM_AUTH_TOKEN";

/// Environment fallback for the upstream client id.
pub const UPSTREAM_CLIENT_ID_ENV: &str = "FURQAN_UPSTREAM_CLIENT_ID";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8000".to_string()
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL (default: https://api.quran.com/api/v4).
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Cross-origin access configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    [
        "https://alquran-furqan.vercel.app",
        "https://alquran-foundation.vercel.app",
        "https://quran-furqan.vercel.app",
        "http://localhost:5009",
        "http://192.168.1.2:5009",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Secrets configuration (upstream credentials).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub upstream: Option<UpstreamSecret>,
}

/// Upstream API credentials.
#[derive(Clone, Default, Deserialize)]
pub struct UpstreamSecret {
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

impl std::fmt::Debug for UpstreamSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamSecret")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl Config {
    /// Load configuration from the standard locations, then apply
    /// environment overrides.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.furqan/config.toml`
    /// 3. `/etc/furqan/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path)?,
            None => Config::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FurqanError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            FurqanError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Apply overrides looked up through `lookup` (normally the environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(UPSTREAM_URL_ENV).filter(|url| !url.is_empty()) {
            self.upstream.base_url = url;
        }
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(FurqanError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".furqan").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/furqan/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.furqan/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/furqan/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (credentials may come from env vars).
    pub fn load() -> Result<Self> {
        // Try user secrets first
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".furqan").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        // Try system secrets
        let system_secrets = PathBuf::from("/etc/furqan/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Parse secrets from a specific file. Permissions are not checked here.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FurqanError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            FurqanError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    pub fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            FurqanError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(FurqanError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn check_permissions(_path: &Path) -> Result<()> {
        // Permission check not available on non-Unix platforms
        Ok(())
    }

    /// Upstream credentials from the environment fallbacks.
    pub fn credentials(&self) -> UpstreamCredentials {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    /// Upstream credentials, falling back to `lookup` for unset values.
    pub fn credentials_with(&self, lookup: impl Fn(&str) -> Option<String>) -> UpstreamCredentials {
        let file = self.upstream.clone().unwrap_or_default();
        UpstreamCredentials {
            auth_token: file.auth_token.or_else(|| lookup(UPSTREAM_AUTH_TOKEN_ENV)),
            client_id: file.client_id.or_else(|| lookup(UPSTREAM_CLIENT_ID_ENV)),
        }
    }
}
