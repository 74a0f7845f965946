//! Blocking Cloud Print service
//!
//! Synchronous front end over the async service. It owns a current-thread
//! Tokio runtime and drives each call to completion on it, so it must not be
//! used from inside another runtime.

use cloudprint_protocol::{CloudPrintJob, CloudPrintShare, CloudPrinters};
use tokio::runtime::{Builder, Runtime};

use super::service::{self, ContentType};
use crate::common::{ApiResult, CloudPrintError, CloudPrintResult};
use crate::config::ServiceConfig;

#[derive(Debug)]
pub struct CloudPrintService {
    inner: service::CloudPrintService,
    runtime: Runtime,
}

impl CloudPrintService {
    pub fn new(inner: service::CloudPrintService) -> CloudPrintResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CloudPrintError::configuration(format!("Failed to start runtime: {}", e)))?;
        Ok(Self { inner, runtime })
    }

    pub fn from_config(config: &ServiceConfig) -> CloudPrintResult<Self> {
        Self::new(service::CloudPrintService::from_config(config)?)
    }

    pub fn search(&self) -> ApiResult<CloudPrinters> {
        self.runtime.block_on(self.inner.search())
    }

    pub fn submit(
        &self,
        printer_id: &str,
        title: &str,
        content: &str,
        content_type: ContentType,
    ) -> ApiResult<CloudPrintJob> {
        self.runtime
            .block_on(self.inner.submit(printer_id, title, content, content_type))
    }

    pub fn print_url(&self, printer_id: &str, title: &str, url: &str) -> ApiResult<CloudPrintJob> {
        self.runtime.block_on(self.inner.print_url(printer_id, title, url))
    }

    pub fn print_document(
        &self,
        printer_id: &str,
        title: &str,
        document: &[u8],
        mime_type: &str,
    ) -> ApiResult<CloudPrintJob> {
        self.runtime
            .block_on(self.inner.print_document(printer_id, title, document, mime_type))
    }

    pub fn share(&self, printer_id: &str, email: &str, skip_notification: bool) -> ApiResult<CloudPrintShare> {
        self.runtime
            .block_on(self.inner.share(printer_id, email, skip_notification))
    }

    pub fn unshare(&self, printer_id: &str, email: &str) -> ApiResult<CloudPrintShare> {
        self.runtime.block_on(self.inner.unshare(printer_id, email))
    }

    pub fn process_invite(&self, printer_id: &str) -> ApiResult<CloudPrintJob> {
        self.runtime.block_on(self.inner.process_invite(printer_id))
    }
}
