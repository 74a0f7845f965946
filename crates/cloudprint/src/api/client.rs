//! Cloud Print Request Dispatcher
//!
//! Turns a verb name and an optional form into exactly one authenticated
//! POST against `<base>/<verb>?output=json`, and the response into a typed
//! [`ApiResult`]. Every failure is classified; nothing panics or escapes.

use cloudprint_protocol::{CloudResponse, MultipartForm};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::auth::CredentialManager;
use crate::common::{create_http_client_with_timeouts, ApiResult, CloudPrintError, CloudPrintResult};
use crate::config::ServiceConfig;

/// Header identifying the calling proxy/application
pub const PROXY_HEADER: &str = "X-CloudPrint-Proxy";

/// Authenticated Cloud Print client
#[derive(Debug)]
pub struct CloudPrintClient {
    http: Client,
    credentials: CredentialManager,
    base_url: String,
    source: String,
}

impl CloudPrintClient {
    pub fn new(
        http: Client,
        credentials: CredentialManager,
        base_url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            http,
            credentials,
            base_url: base_url.into(),
            source: source.into(),
        }
    }

    /// Build the HTTP client and credential manager described by `config`.
    ///
    /// Key material is not read here; it is loaded by the first call.
    pub fn from_config(config: &ServiceConfig) -> CloudPrintResult<Self> {
        let http = create_http_client_with_timeouts(config.timeout_secs, config.connect_timeout_secs)?;
        let credentials = CredentialManager::from_config(config, http.clone());
        Ok(Self::new(http, credentials, config.api_base_url.clone(), config.source.clone()))
    }

    /// Endpoint for `verb`.
    pub fn verb_url(&self, verb: &str) -> String {
        format!("{}/{}?output=json", self.base_url.trim_end_matches('/'), verb)
    }

    /// Invoke `verb`, sending `form` as multipart/form-data when given and
    /// no body otherwise.
    pub async fn call<T>(&self, verb: &str, form: Option<&MultipartForm>) -> ApiResult<T>
    where
        T: DeserializeOwned + CloudResponse,
    {
        self.dispatch(verb, form).await.into()
    }

    async fn dispatch<T>(&self, verb: &str, form: Option<&MultipartForm>) -> CloudPrintResult<T>
    where
        T: DeserializeOwned + CloudResponse,
    {
        let token = self.credentials.ensure_valid_token().await?;

        let url = self.verb_url(verb);
        let mut builder = self
            .http
            .post(&url)
            .header(PROXY_HEADER, &self.source)
            .header(AUTHORIZATION, format!("OAuth {}", token));

        if let Some(form) = form {
            let body = form.build();
            debug!("Calling {} with {} parameter(s)", verb, form.len());
            builder = builder
                .header(CONTENT_TYPE, body.content_type())
                .body(body.bytes);
        } else {
            debug!("Calling {} without parameters", verb);
        }

        self.execute_request(verb, builder).await
    }

    /// Send a request and classify the response
    async fn execute_request<T>(&self, verb: &str, builder: RequestBuilder) -> CloudPrintResult<T>
    where
        T: DeserializeOwned + CloudResponse,
    {
        let response = builder.send().await.map_err(|e| {
            error!("Cloud Print {} request failed: {}", verb, e);
            CloudPrintError::Transport(e)
        })?;

        let status = response.status();
        debug!("Response status for {}: {}", verb, status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited by Cloud Print API");
        }

        let body = response.text().await.map_err(|e| {
            error!("Failed to read {} response body: {}", verb, e);
            CloudPrintError::Transport(e)
        })?;

        if !status.is_success() {
            warn!("Cloud Print {} returned {}: {}", verb, status, body);
            return Err(CloudPrintError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        decode_response(body)
    }
}

/// Decode a 2xx body, treating an in-band `"success": false` as a rejection.
fn decode_response<T>(body: String) -> CloudPrintResult<T>
where
    T: DeserializeOwned + CloudResponse,
{
    let payload: T = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(source) => {
            warn!("Failed to parse Cloud Print response: {}", source);
            return Err(CloudPrintError::Decode { source, body });
        }
    };

    if !payload.success() {
        let message = payload
            .message()
            .filter(|m| !m.is_empty())
            .unwrap_or("Cloud Print reported failure without a message")
            .to_string();
        warn!("Cloud Print rejected request: {}", message);
        return Err(CloudPrintError::Rejected(message));
    }

    Ok(payload)
}
