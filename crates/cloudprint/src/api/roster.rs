//! Printer roster: the printers returned by the last `search`.

use cloudprint_protocol::{CloudPrinter, CloudPrinters};

use crate::common::ApiResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrinterRoster {
    printers: Vec<CloudPrinter>,
}

impl PrinterRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster with a successful search result; a failed search
    /// leaves it empty.
    pub fn update(&mut self, result: &ApiResult<CloudPrinters>) {
        match result.payload() {
            Some(found) => self.printers = found.printers.clone(),
            None => self.printers.clear(),
        }
    }

    pub fn printers(&self) -> &[CloudPrinter] {
        &self.printers
    }

    pub fn len(&self) -> usize {
        self.printers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.printers.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&CloudPrinter> {
        self.printers.iter().find(|p| p.id == id)
    }

    /// Match on `name`, then on `displayName`.
    pub fn by_name(&self, name: &str) -> Option<&CloudPrinter> {
        self.printers
            .iter()
            .find(|p| p.name == name)
            .or_else(|| self.printers.iter().find(|p| p.display_name.as_deref() == Some(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CloudPrintError;

    fn found(body: &str) -> ApiResult<CloudPrinters> {
        ApiResult::Success(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_update_replaces_printers() {
        let mut roster = PrinterRoster::new();
        roster.update(&found(
            r#"{"success":true,"printers":[{"id":"p1","name":"Printer One"},{"id":"p2","name":"Two","displayName":"Lobby"}]}"#,
        ));
        assert_eq!(roster.len(), 2);

        roster.update(&found(r#"{"success":true,"printers":[{"id":"p1","name":"Printer One"}]}"#));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.printers()[0].id, "p1");
    }

    #[test]
    fn test_failed_search_clears() {
        let mut roster = PrinterRoster::new();
        roster.update(&found(r#"{"success":true,"printers":[{"id":"p1","name":"Printer One"}]}"#));

        roster.update(&ApiResult::Failure(CloudPrintError::Rejected("nope".to_string())));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_lookup() {
        let mut roster = PrinterRoster::new();
        roster.update(&found(
            r#"{"success":true,"printers":[{"id":"p1","name":"Printer One"},{"id":"p2","name":"Two","displayName":"Lobby"}]}"#,
        ));

        assert_eq!(roster.by_id("p2").map(|p| p.name.as_str()), Some("Two"));
        assert_eq!(roster.by_name("Printer One").map(|p| p.id.as_str()), Some("p1"));
        assert_eq!(roster.by_name("Lobby").map(|p| p.id.as_str()), Some("p2"));
        assert!(roster.by_id("missing").is_none());
    }
}
