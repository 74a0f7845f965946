//! Cloud Print Verbs
//!
//! One method per remote operation. Each builds the verb's parameter set and
//! hands it to the dispatcher; none of them retries.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cloudprint_protocol::{CloudPrintJob, CloudPrintShare, CloudPrinters, MultipartForm};

use super::client::CloudPrintClient;
use crate::common::{ApiResult, CloudPrintResult};
use crate::config::ServiceConfig;

/// Capabilities ticket sent with every job: printer defaults.
pub const DEFAULT_CAPABILITIES: &str = r#"{"capabilities":[{}]}"#;

/// Role granted by `share`.
pub const SHARE_ROLE: &str = "APPENDER";

/// How the `content` parameter of a job is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// `content` is a URL the service fetches
    Url,
    /// `content` is a `data:<mime>;base64,...` URL
    DataUrl,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::DataUrl => "dataUrl",
        }
    }
}

/// Async Cloud Print service
#[derive(Debug)]
pub struct CloudPrintService {
    client: CloudPrintClient,
}

impl CloudPrintService {
    pub fn new(client: CloudPrintClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ServiceConfig) -> CloudPrintResult<Self> {
        Ok(Self::new(CloudPrintClient::from_config(config)?))
    }

    /// List printers visible to the service account.
    pub async fn search(&self) -> ApiResult<CloudPrinters> {
        self.client.call("search", None).await
    }

    /// Submit a job whose `content` is already in its wire form.
    pub async fn submit(
        &self,
        printer_id: &str,
        title: &str,
        content: &str,
        content_type: ContentType,
    ) -> ApiResult<CloudPrintJob> {
        let form = submit_form(printer_id, title, content, content_type);
        self.client.call("submit", Some(&form)).await
    }

    /// Print a document the service downloads from `url`.
    pub async fn print_url(&self, printer_id: &str, title: &str, url: &str) -> ApiResult<CloudPrintJob> {
        self.submit(printer_id, title, url, ContentType::Url).await
    }

    /// Print an in-memory document, inlined as a base64 data URL.
    pub async fn print_document(
        &self,
        printer_id: &str,
        title: &str,
        document: &[u8],
        mime_type: &str,
    ) -> ApiResult<CloudPrintJob> {
        let content = data_url(mime_type, document);
        self.submit(printer_id, title, &content, ContentType::DataUrl).await
    }

    /// Grant `email` permission to submit jobs to a printer.
    pub async fn share(&self, printer_id: &str, email: &str, skip_notification: bool) -> ApiResult<CloudPrintShare> {
        let form = MultipartForm::new()
            .field("printerid", printer_id)
            .field("email", email)
            .field("role", SHARE_ROLE)
            .field("skip_notification", skip_notification.to_string());
        self.client.call("share", Some(&form)).await
    }

    /// Revoke `email`'s access to a printer.
    pub async fn unshare(&self, printer_id: &str, email: &str) -> ApiResult<CloudPrintShare> {
        let form = MultipartForm::new()
            .field("printerid", printer_id)
            .field("email", email);
        self.client.call("unshare", Some(&form)).await
    }

    /// Accept a pending share invitation for a printer.
    pub async fn process_invite(&self, printer_id: &str) -> ApiResult<CloudPrintJob> {
        let form = MultipartForm::new()
            .field("printerid", printer_id)
            .field("accept", "true");
        self.client.call("processinvite", Some(&form)).await
    }
}

fn submit_form(printer_id: &str, title: &str, content: &str, content_type: ContentType) -> MultipartForm {
    MultipartForm::new()
        .field("printerid", printer_id)
        .field("capabilities", DEFAULT_CAPABILITIES)
        .field("contentType", content_type.as_str())
        .field("title", title)
        .field("content", content)
}

fn data_url(mime_type: &str, document: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudprint_protocol::ParamKind;

    #[test]
    fn test_submit_form_parameters() {
        let form = submit_form("abc123", "Report", "https://example.com/doc.pdf", ContentType::Url);
        let names: Vec<_> = form.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["printerid", "capabilities", "contentType", "title", "content"]);
        assert!(form.params().iter().all(|p| p.kind == ParamKind::Field));
        assert_eq!(form.params()[1].value, r#"{"capabilities":[{}]}"#);
        assert_eq!(form.params()[2].value, "url");
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("application/pdf", b"%PDF"), "data:application/pdf;base64,JVBERg==");
    }

    #[test]
    fn test_content_type_wire_names() {
        assert_eq!(ContentType::Url.as_str(), "url");
        assert_eq!(ContentType::DataUrl.as_str(), "dataUrl");
    }
}
