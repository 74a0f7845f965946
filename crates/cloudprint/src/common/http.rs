//! HTTP Client Utilities
//!
//! Shared HTTP client creation with consistent configuration.

use std::time::Duration;

use super::result::CloudPrintResult;

/// Default whole-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Create a reqwest HTTP client with custom timeouts
pub fn create_http_client_with_timeouts(
    timeout_secs: u64,
    connect_timeout_secs: u64,
) -> CloudPrintResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .user_agent(concat!("cloudprint/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
