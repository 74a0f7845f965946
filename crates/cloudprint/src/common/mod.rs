//! Common Utilities
//!
//! Shared error types, result envelopes, HTTP client construction and path
//! resolution used across the crate.

pub mod error;
pub mod http;
pub mod paths;
pub mod result;

pub use error::{CloudPrintError, ErrorKind};
pub use http::create_http_client_with_timeouts;
pub use paths::default_config_path;
pub use result::{ApiResult, CloudPrintResult};
