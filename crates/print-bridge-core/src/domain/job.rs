//! Print job requests.
//!
//! A [`PrintJob`] exists for the duration of one request.  Both transports
//! build it through [`PrintJob::from_parts`], which applies the single
//! validation rule of the bridge: the printer name is optional everywhere,
//! the content of a custom print is mandatory.

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Label echoed in results when no printer was named and the system default
/// was used.
pub const DEFAULT_PRINTER_LABEL: &str = "Default";

/// Kind of payload carried by a job.  Only plain text is supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Text,
}

/// A validated request to print text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    /// Target queue; `None` means the system default.
    pub printer: Option<String>,
    /// Text to print.  Never empty.
    pub content: String,
    pub content_type: ContentType,
}

impl PrintJob {
    /// Builds a job from the optional fields of an inbound request.
    ///
    /// An empty printer name is treated the same as an absent one.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] if `content` is absent or empty.
    pub fn from_parts(printer: Option<String>, content: Option<String>) -> Result<Self, BridgeError> {
        let content = match content {
            Some(c) if !c.is_empty() => c,
            _ => return Err(BridgeError::Validation("Print content is required".to_string())),
        };

        Ok(Self {
            printer: normalize_printer(printer),
            content,
            content_type: ContentType::Text,
        })
    }

    /// Name to report back in results: the requested printer or `"Default"`.
    pub fn printer_label(&self) -> &str {
        printer_label(self.printer.as_deref())
    }
}

/// Drops empty printer names so they fall back to the system default.
pub fn normalize_printer(printer: Option<String>) -> Option<String> {
    printer.filter(|p| !p.trim().is_empty())
}

/// Returns `printer` or [`DEFAULT_PRINTER_LABEL`] when none was named.
pub fn printer_label(printer: Option<&str>) -> &str {
    printer.unwrap_or(DEFAULT_PRINTER_LABEL)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
