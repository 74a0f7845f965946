//! Token Provider Abstraction
//!
//! Anything that can mint a fresh OAuth2 access token. The credential
//! manager owns one provider and asks it for a token whenever the cached
//! one has expired.

pub mod service_account;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

use crate::common::CloudPrintResult;

pub use service_account::ServiceAccountProvider;

/// Tokens returned from a token endpoint.
#[derive(Clone)]
pub struct OAuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expiry: DateTime<Utc>,
}

// Custom Debug implementation that redacts the token
impl fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Source of access tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Obtain a new access token. Called on first use and after expiry.
    async fn request_token(&self) -> CloudPrintResult<OAuthTokens>;
}
