//! Cloud Print API
//!
//! Request dispatcher, verb wrappers (async and blocking) and the printer
//! roster.

pub mod blocking;
pub mod client;
pub mod roster;
pub mod service;

pub use client::{CloudPrintClient, PROXY_HEADER};
pub use roster::PrinterRoster;
pub use service::{CloudPrintService, ContentType, DEFAULT_CAPABILITIES, SHARE_ROLE};
