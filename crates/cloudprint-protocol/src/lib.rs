//! Cloud Print Protocol
//!
//! Wire-level types shared by the client library and the CLI:
//! the multipart/form-data request body builder and the JSON response
//! records returned by the Cloud Print REST API. Nothing in this crate
//! performs I/O.

pub mod model;
pub mod multipart;

pub use model::{CloudPrintJob, CloudPrintShare, CloudPrinter, CloudPrinters, CloudResponse, PrintJob};
pub use multipart::{FormParameter, MultipartBody, MultipartForm, ParamKind};
