//! Common Result Types
//!
//! `CloudPrintResult` is the internal plumbing alias. `ApiResult` is what
//! every public verb hands back: a finished call is always either a decoded
//! payload or a classified failure, never a panic or a half-filled record.

use cloudprint_protocol::CloudResponse;

use super::error::{CloudPrintError, ErrorKind};

/// Internal result type
pub type CloudPrintResult<T> = Result<T, CloudPrintError>;

/// Outcome of one Cloud Print call.
#[derive(Debug)]
pub enum ApiResult<T> {
    Success(T),
    Failure(CloudPrintError),
}

impl<T> ApiResult<T> {
    pub fn success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CloudPrintError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.error().map(CloudPrintError::kind)
    }

    pub fn into_result(self) -> CloudPrintResult<T> {
        self.into()
    }
}

impl<T: CloudResponse> ApiResult<T> {
    /// The remote `message` on success, the failure message otherwise.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Success(payload) => payload.message().map(String::from),
            Self::Failure(err) => Some(err.message()),
        }
    }
}

impl<T> From<CloudPrintResult<T>> for ApiResult<T> {
    fn from(result: CloudPrintResult<T>) -> Self {
        match result {
            Ok(payload) => Self::Success(payload),
            Err(err) => Self::Failure(err),
        }
    }
}

impl<T> From<ApiResult<T>> for CloudPrintResult<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            ApiResult::Success(payload) => Ok(payload),
            ApiResult::Failure(err) => Err(err),
        }
    }
}
