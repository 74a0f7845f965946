//! Cloud Print client
//!
//! Service-account authenticated access to the Cloud Print REST API:
//! credential management, request dispatch and one method per verb.
//!
//! ```no_run
//! # async fn run() -> cloudprint::CloudPrintResult<()> {
//! use cloudprint::{CloudPrintService, PrinterRoster, ServiceConfig};
//!
//! let config = ServiceConfig::with_json_key("office-proxy", "/etc/cloudprint/key.json");
//! let service = CloudPrintService::from_config(&config)?;
//!
//! let mut roster = PrinterRoster::new();
//! let found = service.search().await;
//! roster.update(&found);
//!
//! if let Some(printer) = roster.by_name("Front Desk") {
//!     let job = service.print_url(&printer.id, "Report", "https://example.com/doc.pdf").await;
//!     println!("submitted: {}", job.success());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod common;
pub mod config;

pub use api::{blocking, CloudPrintClient, CloudPrintService, ContentType, PrinterRoster};
pub use auth::provider::{OAuthTokens, ServiceAccountProvider, TokenProvider};
pub use auth::{Credential, CredentialManager};
pub use common::{ApiResult, CloudPrintError, CloudPrintResult, ErrorKind};
pub use config::{CredentialSource, ServiceConfig};

pub use cloudprint_protocol::{
    CloudPrintJob, CloudPrintShare, CloudPrinter, CloudPrinters, CloudResponse, FormParameter,
    MultipartForm, PrintJob,
};
