//! Mock backend strategy: a fixed set of printers that accept every job.
//!
//! Lets the bridge and its web client run on a machine with no spooler and
//! no print service.  Nothing is printed; jobs are only logged.

use async_trait::async_trait;
use tracing::info;

use print_bridge_core::{BridgeError, PrintJob, PrintResult, PrinterDescriptor, PrinterStatus};

use crate::application::backend::{BackendInfo, PrintBackend};
use crate::domain::BackendStrategy;

/// Printer the mock reports as the system default.
pub const MOCK_DEFAULT_PRINTER: &str = "Default_Printer_macOS";

const MOCK_PRINTERS: [&str; 3] = ["HP LaserJet Pro", "Canon PIXMA", MOCK_DEFAULT_PRINTER];

/// [`PrintBackend`] with canned printers and no side effects.
#[derive(Debug, Default)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PrintBackend for MockBackend {
    fn describe(&self) -> BackendInfo {
        BackendInfo {
            strategy: BackendStrategy::Mock,
            url: None,
        }
    }

    async fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, BridgeError> {
        Ok(MOCK_PRINTERS
            .iter()
            .map(|name| PrinterDescriptor {
                server: Some("Local".to_string()),
                ..PrinterDescriptor::new(*name, PrinterStatus::Idle)
                    .with_default(*name == MOCK_DEFAULT_PRINTER)
            })
            .collect())
    }

    async fn default_printer(&self) -> Option<String> {
        Some(MOCK_DEFAULT_PRINTER.to_string())
    }

    async fn print_text(&self, job: &PrintJob) -> Result<PrintResult, BridgeError> {
        let label = job.printer_label();
        info!(
            "mock print: {} chars to {}",
            job.content.chars().count(),
            job.printer.as_deref().unwrap_or(MOCK_DEFAULT_PRINTER)
        );
        Ok(PrintResult::succeeded(label, format!("Content sent to {label}")))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_printers_returns_the_canned_set() {
        // Arrange
        let backend = MockBackend::new();

        // Act
        let printers = backend.list_printers().await.unwrap();

        // Assert
        let names: Vec<&str> = printers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["HP LaserJet Pro", "Canon PIXMA", "Default_Printer_macOS"]);
        assert!(printers.iter().all(|p| p.status == PrinterStatus::Idle));
        assert!(printers.iter().all(|p| p.server.as_deref() == Some("Local")));
    }

    #[tokio::test]
    async fn test_only_the_default_printer_is_flagged() {
        let printers = MockBackend::new().list_printers().await.unwrap();

        let flagged: Vec<&str> = printers
            .iter()
            .filter(|p| p.is_default)
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(flagged, [MOCK_DEFAULT_PRINTER]);
        assert_eq!(
            MockBackend::new().default_printer().await.as_deref(),
            Some(MOCK_DEFAULT_PRINTER)
        );
    }

    #[tokio::test]
    async fn test_print_text_always_succeeds() {
        let job = PrintJob::from_parts(Some("Canon PIXMA".into()), Some("hello".into())).unwrap();

        let result = MockBackend::new().print_text(&job).await.unwrap();

        assert_eq!(
            result,
            PrintResult::succeeded("Canon PIXMA", "Content sent to Canon PIXMA")
        );
    }

    #[tokio::test]
    async fn test_print_test_page_without_printer_echoes_default_label() {
        let result = MockBackend::new().print_test_page(None).await.unwrap();

        assert!(result.success);
        assert_eq!(result.printer, "Default");
    }

    #[test]
    fn test_describe_reports_mock_without_url() {
        assert_eq!(
            MockBackend::new().describe(),
            BackendInfo {
                strategy: BackendStrategy::Mock,
                url: None,
            }
        );
    }
}
