//! Printer descriptors.
//!
//! A [`PrinterDescriptor`] is what both transports hand back for a printer
//! listing.  It is serialized with camelCase field names:
//!
//! ```json
//! {"name":"HP_LaserJet","status":"idle","isDefault":true}
//! ```
//!
//! # Legacy status strings
//!
//! Older backend processes report status as free-form strings (`"Ready"`,
//! `"Busy/Error"`, `"Unknown"`).  Those are accepted on input through serde
//! aliases and collapsed onto the two-state [`PrinterStatus`]; on output the
//! bridge always writes `"idle"` or `"busy"`.

use serde::{Deserialize, Serialize};

/// Whether a printer can accept a job right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrinterStatus {
    /// The printer is ready for work.
    #[serde(rename = "idle", alias = "Ready", alias = "ready", alias = "Available")]
    Idle,

    /// The printer is printing, paused, in an error state, or its state could
    /// not be determined.
    #[serde(
        rename = "busy",
        alias = "Busy/Error",
        alias = "Busy",
        alias = "Unknown",
        alias = "Error"
    )]
    Busy,
}

/// One printer known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterDescriptor {
    /// Queue name as understood by the OS spooler.
    pub name: String,

    /// Current state.
    pub status: PrinterStatus,

    /// `true` for the system default printer.  Absent on input means `false`.
    #[serde(default)]
    pub is_default: bool,

    /// Where the queue lives: `"Local"` or the host sharing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl PrinterDescriptor {
    /// Creates a local, non-default descriptor.
    pub fn new(name: impl Into<String>, status: PrinterStatus) -> Self {
        Self {
            name: name.into(),
            status,
            is_default: false,
            server: None,
        }
    }

    /// Marks the descriptor as the default printer.
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_serializes_with_camel_case_fields() {
        // Arrange
        let printer = PrinterDescriptor::new("LaserJet", PrinterStatus::Idle).with_default(true);

        // Act
        let json = serde_json::to_value(&printer).unwrap();

        // Assert
        assert_eq!(
            json,
            serde_json::json!({"name": "LaserJet", "status": "idle", "isDefault": true})
        );
    }

    #[test]
    fn test_server_field_omitted_when_absent() {
        let printer = PrinterDescriptor::new("p", PrinterStatus::Busy);
        let json = serde_json::to_string(&printer).unwrap();
        assert!(!json.contains("server"));
    }

    #[test]
    fn test_legacy_ready_status_maps_to_idle() {
        let printer: PrinterDescriptor =
            serde_json::from_str(r#"{"name":"Canon","server":"Local","status":"Ready"}"#).unwrap();
        assert_eq!(printer.status, PrinterStatus::Idle);
        assert!(!printer.is_default, "missing isDefault must default to false");
        assert_eq!(printer.server.as_deref(), Some("Local"));
    }

    #[test]
    fn test_legacy_busy_error_status_maps_to_busy() {
        let printer: PrinterDescriptor =
            serde_json::from_str(r#"{"name":"x","status":"Busy/Error"}"#).unwrap();
        assert_eq!(printer.status, PrinterStatus::Busy);
    }

    #[test]
    fn test_unknown_status_string_is_rejected() {
        let result = serde_json::from_str::<PrinterDescriptor>(r#"{"name":"x","status":"melting"}"#);
        assert!(result.is_err());
    }
}
