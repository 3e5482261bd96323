//! Remote backend strategy: forward every operation to an HTTP print service.
//!
//! The remote service exposes two endpoints:
//!
//! ```text
//! GET  {base}/printers       → {"status":"success","printers":[...],"defaultPrinter":"..."}
//! POST {base}/print-content  ← {"printer":"...","content":"...","content_type":"text"}
//!                            → {"success":true,"message":"..."}
//!                              or {"status":"success","message":"...","printer":"..."}
//! ```
//!
//! Older services report printers as `{"name","server","status":"Ready"}` and
//! print outcomes with a `status` string instead of a `success` flag; both
//! shapes are accepted.  Test pages are rendered locally and sent through
//! `/print-content` like any other text.
//!
//! Any transport failure, non-2xx status, `"status":"error"` listing, or
//! undecodable body is reported as [`BridgeError::BackendUnavailable`].  For
//! non-2xx replies the service's own `message` is kept in the error.  No
//! request is retried.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use print_bridge_core::domain::job::ContentType;
use print_bridge_core::{BridgeError, PrintJob, PrintResult, PrinterDescriptor};

use crate::application::backend::{BackendInfo, PrintBackend};
use crate::domain::BackendStrategy;

/// Listing body returned by `GET /printers`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrinterListing {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    printers: Vec<PrinterDescriptor>,
    #[serde(default)]
    default_printer: Option<String>,
}

/// Body sent to `POST /print-content`.
#[derive(Debug, Serialize)]
struct PrintContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    printer: Option<&'a str>,
    content: &'a str,
    content_type: ContentType,
}

/// Body returned by `POST /print-content`.
#[derive(Debug, Deserialize)]
struct PrintContentResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl PrintContentResponse {
    fn succeeded(&self) -> bool {
        self.success
            .unwrap_or_else(|| self.status.as_deref() == Some("success"))
    }
}

/// [`PrintBackend`] backed by a remote HTTP service.
pub struct RemoteBackend {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteBackend {
    /// Creates a backend talking to `base_url` (trailing slashes are ignored).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch_listing(&self) -> Result<PrinterListing, BridgeError> {
        let url = self.endpoint("printers");
        let response = self.client.get(&url).send().await.map_err(unavailable)?;
        let listing: PrinterListing = checked(response)
            .await?
            .json()
            .await
            .map_err(unavailable)?;

        if listing.status.as_deref() == Some("error") {
            let message = listing
                .message
                .unwrap_or_else(|| "backend reported an error".to_string());
            return Err(BridgeError::BackendUnavailable(message));
        }

        Ok(listing)
    }
}

#[async_trait]
impl PrintBackend for RemoteBackend {
    fn describe(&self) -> BackendInfo {
        BackendInfo {
            strategy: BackendStrategy::Remote,
            url: Some(self.base_url.clone()),
        }
    }

    async fn list_printers(&self) -> Result<Vec<PrinterDescriptor>, BridgeError> {
        let listing = self.fetch_listing().await?;
        let default = listing.default_printer;

        let printers: Vec<PrinterDescriptor> = listing
            .printers
            .into_iter()
            .map(|p| {
                let is_default = p.is_default || default.as_deref() == Some(p.name.as_str());
                p.with_default(is_default)
            })
            .collect();

        debug!("remote backend listed {} printers", printers.len());
        Ok(printers)
    }

    async fn default_printer(&self) -> Option<String> {
        match self.fetch_listing().await {
            Ok(listing) => listing.default_printer.or_else(|| {
                listing
                    .printers
                    .into_iter()
                    .find(|p| p.is_default)
                    .map(|p| p.name)
            }),
            Err(e) => {
                warn!("could not query default printer: {e}");
                None
            }
        }
    }

    async fn print_text(&self, job: &PrintJob) -> Result<PrintResult, BridgeError> {
        let label = job.printer_label();
        let body = PrintContentRequest {
            printer: job.printer.as_deref(),
            content: &job.content,
            content_type: job.content_type,
        };

        let response = self
            .client
            .post(self.endpoint("print-content"))
            .json(&body)
            .send()
            .await
            .map_err(unavailable)?;
        let response: PrintContentResponse = checked(response)
            .await?
            .json()
            .await
            .map_err(unavailable)?;

        let result = if response.succeeded() {
            let message = response
                .message
                .unwrap_or_else(|| format!("Content sent to {label}"));
            PrintResult::succeeded(label, message)
        } else {
            let message = response
                .message
                .or(response.error)
                .unwrap_or_else(|| "Failed to print content".to_string());
            PrintResult::failed(label, message)
        };

        debug!(
            "remote print to {label}: {}",
            if result.success { "ok" } else { "failed" }
        );
        Ok(result)
    }
}

fn unavailable(err: reqwest::Error) -> BridgeError {
    BridgeError::BackendUnavailable(err.to_string())
}

/// Error body a print service sends alongside a non-2xx status.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Passes 2xx responses through; anything else becomes
/// [`BridgeError::BackendUnavailable`] carrying the service's own message
/// when its body has one.
async fn checked(response: reqwest::Response) -> Result<reqwest::Response, BridgeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .and_then(|e| e.message.or(e.error))
        .filter(|m| !m.is_empty());

    Err(BridgeError::BackendUnavailable(match detail {
        Some(message) => format!("HTTP {status}: {message}"),
        None => format!("HTTP {status}"),
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
