//! Configuration management
//!
//! Service settings and credential source, read from a JSON file
//! (default `~/.cloudprint/config.json`) or assembled in code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::common::http::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use crate::common::{default_config_path, CloudPrintError, CloudPrintResult};

/// Cloud Print REST endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://www.google.com/cloudprint";
/// OAuth2 token endpoint for service accounts
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// OAuth2 scope granting Cloud Print access
pub const CLOUD_PRINT_SCOPE: &str = "https://www.googleapis.com/auth/cloudprint";
/// Refresh tokens this many seconds before they expire
pub const DEFAULT_REFRESH_MARGIN_SECS: i64 = 60;

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn default_scope() -> String {
    CLOUD_PRINT_SCOPE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_refresh_margin_secs() -> i64 {
    DEFAULT_REFRESH_MARGIN_SECS
}

/// Where the service-account signing material comes from.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    /// Service-account JSON key file (`type`, `client_email`, `private_key`)
    JsonKey { path: PathBuf },
    /// PKCS#12 bundle unlocked with a passphrase, bound to an account email
    Certificate {
        service_account_email: String,
        key_file_path: PathBuf,
        key_file_secret: String,
    },
}

// Custom Debug implementation that redacts the passphrase
impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonKey { path } => f.debug_struct("JsonKey").field("path", path).finish(),
            Self::Certificate {
                service_account_email,
                key_file_path,
                ..
            } => f
                .debug_struct("Certificate")
                .field("service_account_email", service_account_email)
                .field("key_file_path", key_file_path)
                .field("key_file_secret", &"[REDACTED]")
                .finish(),
        }
    }
}

impl CredentialSource {
    /// Anchor relative key paths at `base`.
    fn resolve_relative_to(&mut self, base: &Path) {
        let path = match self {
            Self::JsonKey { path } => path,
            Self::Certificate { key_file_path, .. } => key_file_path,
        };
        if path.is_relative() {
            *path = base.join(&*path);
        }
    }
}

/// Settings for one Cloud Print service instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Value sent in the `X-CloudPrint-Proxy` header
    pub source: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Used unless the JSON key file names its own `token_uri`
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: i64,
    pub credentials: CredentialSource,
}

impl ServiceConfig {
    pub fn new(source: impl Into<String>, credentials: CredentialSource) -> Self {
        Self {
            source: source.into(),
            api_base_url: default_api_base_url(),
            token_uri: default_token_uri(),
            scope: default_scope(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            refresh_margin_secs: default_refresh_margin_secs(),
            credentials,
        }
    }

    /// Service authenticated by a JSON key file.
    pub fn with_json_key(source: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(source, CredentialSource::JsonKey { path: path.into() })
    }

    /// Service authenticated by a PKCS#12 certificate.
    pub fn with_certificate(
        source: impl Into<String>,
        service_account_email: impl Into<String>,
        key_file_path: impl Into<PathBuf>,
        key_file_secret: impl Into<String>,
    ) -> Self {
        Self::new(
            source,
            CredentialSource::Certificate {
                service_account_email: service_account_email.into(),
                key_file_path: key_file_path.into(),
                key_file_secret: key_file_secret.into(),
            },
        )
    }

    /// Read a JSON config file. Relative key paths are resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> CloudPrintResult<Self> {
        if !path.exists() {
            return Err(CloudPrintError::configuration(format!(
                "Config file not found at {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            CloudPrintError::configuration(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let mut config: ServiceConfig = serde_json::from_str(&content).map_err(|e| {
            CloudPrintError::configuration(format!("Failed to parse config {}: {}", path.display(), e))
        })?;

        if let Some(dir) = path.parent() {
            config.credentials.resolve_relative_to(dir);
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Read `~/.cloudprint/config.json`.
    pub fn load_default() -> CloudPrintResult<Self> {
        Self::load(&default_config_path()?)
    }
}
