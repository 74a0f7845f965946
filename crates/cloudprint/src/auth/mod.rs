//! Credential Manager
//!
//! Owns the access token for one service instance. The token is obtained
//! lazily on first use, checked before every call and refreshed on demand
//! when it is about to expire. There is no background refresh.
//!
//! Refresh is single-flight: the cached credential sits behind an async
//! mutex that stays locked across the token request, so callers that race on
//! an expired token wait for one refresh instead of each issuing their own.

pub mod key_material;
pub mod provider;

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use self::provider::{OAuthTokens, ServiceAccountProvider, TokenProvider};
use crate::common::CloudPrintResult;
use crate::config::ServiceConfig;

/// Cached token state.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    pub access_token: String,
    #[zeroize(skip)]
    pub token_type: String,
    #[zeroize(skip)]
    pub expiry: DateTime<Utc>,
}

// Custom Debug implementation that redacts the token
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl From<OAuthTokens> for Credential {
    fn from(tokens: OAuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            token_type: tokens.token_type,
            expiry: tokens.expiry,
        }
    }
}

pub struct CredentialManager {
    provider: Arc<dyn TokenProvider>,
    credential: Mutex<Option<Credential>>,
    refresh_margin_secs: i64,
}

impl fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialManager")
            .field("provider", &self.provider.name())
            .field("refresh_margin_secs", &self.refresh_margin_secs)
            .finish()
    }
}

impl CredentialManager {
    pub fn new(provider: Arc<dyn TokenProvider>, refresh_margin_secs: i64) -> Self {
        Self {
            provider,
            credential: Mutex::new(None),
            refresh_margin_secs,
        }
    }

    /// Manager backed by the service account named in `config`.
    pub fn from_config(config: &ServiceConfig, http: reqwest::Client) -> Self {
        let provider = ServiceAccountProvider::from_config(config, http);
        Self::new(Arc::new(provider), config.refresh_margin_secs)
    }

    /// Return an access token that is valid for at least the refresh margin,
    /// requesting a new one first if needed.
    pub async fn ensure_valid_token(&self) -> CloudPrintResult<String> {
        let mut cached = self.credential.lock().await;

        match cached.as_ref() {
            Some(credential) if !is_token_expiring(credential.expiry, self.refresh_margin_secs) => {
                return Ok(credential.access_token.clone());
            }
            Some(credential) => {
                info!(
                    "Access token expires at {}, refreshing via {}",
                    credential.expiry,
                    self.provider.name()
                );
            }
            None => debug!("No access token yet, authorizing via {}", self.provider.name()),
        }

        let credential = match self.provider.request_token().await {
            Ok(tokens) => Credential::from(tokens),
            Err(e) => {
                warn!("Token request via {} failed: {}", self.provider.name(), e);
                return Err(e);
            }
        };

        let token = credential.access_token.clone();
        *cached = Some(credential);
        Ok(token)
    }

    /// Expiry of the cached token, if one has been obtained.
    pub async fn expiry(&self) -> Option<DateTime<Utc>> {
        self.credential.lock().await.as_ref().map(|c| c.expiry)
    }

    /// Drop the cached token so the next call re-authorizes.
    pub async fn invalidate(&self) {
        *self.credential.lock().await = None;
    }
}

/// Check whether a token expires within `margin_secs` seconds. A margin
/// too large to represent counts as expiring.
fn is_token_expiring(expiry: DateTime<Utc>, margin_secs: i64) -> bool {
    match Duration::try_seconds(margin_secs).and_then(|margin| Utc::now().checked_add_signed(margin)) {
        Some(deadline) => expiry <= deadline,
        None => true,
    }
}
