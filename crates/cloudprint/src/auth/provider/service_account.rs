//! Service-Account Token Provider
//!
//! Implements the OAuth2 JWT-bearer grant used by Google service accounts:
//! sign an assertion with the account's private key, post it to the token
//! endpoint, receive a short-lived access token. Signing material is loaded
//! on the first request and reused afterwards.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use super::{OAuthTokens, TokenProvider};
use crate::auth::key_material::ServiceAccountSigner;
use crate::common::{CloudPrintError, CloudPrintResult};
use crate::config::{CredentialSource, ServiceConfig};

/// Grant type for RFC 7523 assertions
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime assumed when the endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Longest token lifetime accepted from the endpoint (one day)
const MAX_EXPIRES_IN_SECS: i64 = 86_400;

/// Token provider backed by a service-account key.
pub struct ServiceAccountProvider {
    source: CredentialSource,
    token_uri: String,
    scope: String,
    http: reqwest::Client,
    signer: OnceCell<ServiceAccountSigner>,
}

impl ServiceAccountProvider {
    pub fn new(
        source: CredentialSource,
        token_uri: impl Into<String>,
        scope: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            source,
            token_uri: token_uri.into(),
            scope: scope.into(),
            http,
            signer: OnceCell::new(),
        }
    }

    pub fn from_config(config: &ServiceConfig, http: reqwest::Client) -> Self {
        Self::new(
            config.credentials.clone(),
            config.token_uri.clone(),
            config.scope.clone(),
            http,
        )
    }

    /// Load (once) and return the signing identity.
    ///
    /// Fails with a configuration error without touching the network, so
    /// callers can validate credentials up front.
    pub async fn signer(&self) -> CloudPrintResult<&ServiceAccountSigner> {
        self.signer
            .get_or_try_init(|| async { ServiceAccountSigner::load(&self.source) })
            .await
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountProvider {
    fn name(&self) -> &str {
        "service_account"
    }

    async fn request_token(&self) -> CloudPrintResult<OAuthTokens> {
        let signer = self.signer().await?;
        let token_uri = signer.token_uri().unwrap_or(&self.token_uri);

        info!("Requesting access token for {}", signer.client_email());

        let assertion = signer.assertion(&self.scope, token_uri, Utc::now())?;
        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let body = post_form(&self.http, token_uri, &params).await?;
        let tokens = parse_token_response(&body, Utc::now())?;

        debug!("Access token valid until {}", tokens.expiry);
        Ok(tokens)
    }
}

// ── HTTP utilities ──────────────────────────────────────────────────────────

/// POST a form-encoded request and return the response body.
async fn post_form(
    http: &reqwest::Client,
    url: &str,
    params: &[(&str, &str)],
) -> CloudPrintResult<String> {
    let response = http.post(url).form(params).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        error!("Token endpoint error {}: {}", status, body);
        return Err(CloudPrintError::auth(format!("HTTP {} error: {}", status, body)));
    }

    Ok(response.text().await?)
}

/// Parse an OAuth2 token response.
fn parse_token_response(body: &str, now: DateTime<Utc>) -> CloudPrintResult<OAuthTokens> {
    let parsed: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| CloudPrintError::auth(format!("Invalid JSON response: {}", e)))?;

    if let Some(err) = parsed.get("error").and_then(|v| v.as_str()) {
        let desc = parsed
            .get("error_description")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error");
        return Err(CloudPrintError::auth(format!("{}: {}", err, desc)));
    }

    let access_token = parsed
        .get("access_token")
        .and_then(|v| v.as_str())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| CloudPrintError::auth("Missing access_token in response"))?
        .to_string();

    let token_type = parsed
        .get("token_type")
        .and_then(|v| v.as_str())
        .unwrap_or("Bearer")
        .to_string();

    let expires_in = match parsed.get("expires_in") {
        None | Some(serde_json::Value::Null) => DEFAULT_EXPIRES_IN_SECS,
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
            .filter(|secs| (0..=MAX_EXPIRES_IN_SECS).contains(secs))
            .ok_or_else(|| CloudPrintError::auth(format!("Invalid expires_in in response: {}", value)))?,
    };

    let expiry = Duration::try_seconds(expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| CloudPrintError::auth("Token expiry out of range"))?;

    Ok(OAuthTokens {
        access_token,
        token_type,
        expiry,
    })
}
