//! The printing backend seam.
//!
//! [`PrintBackend`] is the one interface both transports call.  Three
//! implementations exist in the infrastructure layer and exactly one is
//! chosen at startup from [`crate::domain::BackendConfig`]:
//!
//! - `RemoteBackend` forwards every operation to a separate HTTP service.
//! - `LocalBackend` drives the host's print spooler through `lp` / `lpstat`.
//! - `MockBackend` reports canned printers and accepts every job unprinted.
//!
//! All must honour the same contract: a printer listing is either complete
//! or a [`BridgeError::BackendUnavailable`], never partial; an absent default
//! printer is valid state, not an error.

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;

use print_bridge_core::domain::job::{printer_label, ContentType};
use print_bridge_core::domain::test_page;
use print_bridge_core::{BridgeError, PrintJob, PrintResult, PrinterDescriptor};

use crate::domain::BackendStrategy;

/// Diagnostics describing the active backend, reported by `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendInfo {
    pub strategy: BackendStrategy,
    /// Base URL of the remote backend; absent for the other strategies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Printer enumeration and job submission.
///
/// Implementations are stateless per call, so a single instance is shared by
/// every session and HTTP request behind an `Arc<dyn PrintBackend>`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrintBackend: Send + Sync {
    /// Which strategy this is, for diagnostics.
    fn describe(&self) -> BackendInfo;

    /// Lists every printer the backend can see.
    ///
    /// Zero printers is `Ok(vec![])`.
    async fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, BridgeError>;

    /// Name of the system default printer, or `None` when there is none or
    /// the query failed.
    async fn default_printer(&self) -> Option<String>;

    /// Submits `job.content` to `job.printer` (or the system default).
    ///
    /// A job the spooler refused is `Ok` with `success: false`; failing to
    /// reach the spooler or backend at all is `Err(BackendUnavailable)`.
    async fn print_text(&self, job: &PrintJob) -> Result<PrintResult, BridgeError>;

    /// Prints the fixed test page through [`PrintBackend::print_text`].
    async fn print_test_page(&self, printer: Option<String>) -> Result<PrintResult, BridgeError> {
        let label = printer_label(printer.as_deref()).to_string();
        let job = PrintJob {
            content: test_page::render(&label, &Local::now()),
            printer,
            content_type: ContentType::Text,
        };

        let mut result = self.print_text(&job).await?;
        if result.success {
            result.message = format!("Test page sent to {label}");
        }
        Ok(result)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
