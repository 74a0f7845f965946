//! Cloud Print Response Records
//!
//! JSON bodies returned by the `?output=json` endpoints. Every record carries
//! the service's `success` flag and optional `message`; unknown fields are
//! ignored and missing ones fall back to defaults.

use serde::{Deserialize, Deserializer, Serialize};

/// Common surface of every Cloud Print response envelope.
pub trait CloudResponse {
    /// The service's in-band `success` flag.
    fn success(&self) -> bool;

    /// Human-readable `message`, if the service sent one.
    fn message(&self) -> Option<&str>;
}

macro_rules! cloud_response {
    ($name:ident) => {
        impl CloudResponse for $name {
            fn success(&self) -> bool {
                self.success
            }

            fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }
        }
    };
}

/// A registered printer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudPrinter {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub proxy: Option<String>,
    pub status: Option<String>,
    pub connection_status: Option<String>,
    pub caps_hash: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub access_time: Option<String>,
    pub confirmed: bool,
    #[serde(deserialize_with = "number_or_string")]
    pub number_of_documents: Option<u64>,
    #[serde(deserialize_with = "number_or_string")]
    pub number_of_pages: Option<u64>,
}

/// Result of the `search` verb.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudPrinters {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub printers: Vec<CloudPrinter>,
}

cloud_response!(CloudPrinters);

/// A print job as echoed back by `submit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintJob {
    pub id: String,
    #[serde(rename = "printerid")]
    pub printer_id: Option<String>,
    pub title: Option<String>,
    pub content_type: Option<String>,
    pub status: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    #[serde(deserialize_with = "number_or_string")]
    pub number_of_pages: Option<u64>,
}

/// Result of the `submit` and `processinvite` verbs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudPrintJob {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<PrintJob>,
}

cloud_response!(CloudPrintJob);

/// Result of the `share` and `unshare` verbs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudPrintShare {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

cloud_response!(CloudPrintShare);

/// The service sends counters either as JSON numbers or as decimal strings.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}
