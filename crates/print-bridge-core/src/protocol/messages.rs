//! JSON message types for the real-time WebSocket channel.
//!
//! # Message flow
//!
//! ```text
//! Client → Bridge:  JSON text frame  →  InboundMessage
//! Bridge → Client:  OutboundMessage  →  JSON text frame
//! ```
//!
//! # JSON discriminant
//!
//! Every message is a JSON object with a `"type"` field that identifies the
//! variant.  All other fields are flattened into the same object:
//!
//! ```json
//! {"type":"print","printer":"HP_LaserJet","content":"hello"}
//! {"type":"printResult","data":{"success":true,"message":"...","printer":"HP_LaserJet"}}
//! ```
//!
//! Inbound and outbound directions use separate enums so a notification can
//! never be mistaken for a request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::printer::PrinterDescriptor;
use crate::domain::result::PrintResult;
use crate::error::BridgeError;

/// `type` tags the router knows how to dispatch.
pub const KNOWN_INBOUND_TYPES: [&str; 3] = ["getPrinters", "printTest", "print"];

// ── Client → Bridge messages ──────────────────────────────────────────────────

/// All requests a client can send over the WebSocket.
///
/// Fields the operation treats as optional are `Option`s here, and `print`
/// deliberately keeps `content` optional as well: a missing content is a
/// validation failure reported by the router, not a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    /// List the printers the backend can see.
    #[serde(rename = "getPrinters")]
    GetPrinters,

    /// Print the fixed test page.
    #[serde(rename = "printTest")]
    PrintTest {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        printer: Option<String>,
    },

    /// Print custom text content.
    #[serde(rename = "print")]
    Print {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        printer: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },

    /// Any payload whose `type` is not one of [`KNOWN_INBOUND_TYPES`],
    /// including JSON values that are not objects.
    ///
    /// `kind` holds the tag as sent, or an empty string if it was missing,
    /// not a string, or there was no object to carry it.  Never produced by serde directly; see [`InboundMessage::parse`].
    #[serde(skip)]
    Unknown { kind: String },
}

impl InboundMessage {
    /// Parses one raw text frame.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidMessage`] if `raw` is not valid JSON or
    /// carries a known `type` with ill-typed fields (for example
    /// `"content": 42`).  An unrecognised or missing `type` is *not* an
    /// error at this level; it parses to [`InboundMessage::Unknown`], and so
    /// does valid JSON that is not an object.
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| BridgeError::InvalidMessage(e.to_string()))?;

        // Arrays, numbers, strings and booleans carry no tag at all.
        let kind = match &value {
            Value::Object(fields) => fields
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => return Ok(Self::Unknown { kind: String::new() }),
        };

        if !KNOWN_INBOUND_TYPES.contains(&kind.as_str()) {
            return Ok(Self::Unknown { kind });
        }

        serde_json::from_value(value).map_err(|e| BridgeError::InvalidMessage(e.to_string()))
    }

    /// Short name for log lines; never includes field values.
    pub fn type_name(&self) -> &str {
        match self {
            Self::GetPrinters => "getPrinters",
            Self::PrintTest { .. } => "printTest",
            Self::Print { .. } => "print",
            Self::Unknown { .. } => "unknown",
        }
    }
}

// ── Bridge → Client messages ──────────────────────────────────────────────────

/// All notifications the bridge sends to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// Sent once, immediately after the connection is registered.
    Welcome {
        #[serde(rename = "clientId")]
        client_id: String,
        message: String,
    },

    /// Reply to `getPrinters`.
    Printers { data: Vec<PrinterDescriptor> },

    /// Reply to `printTest` and `print`.
    PrintResult { data: PrintResult },

    /// Any failure while handling a request.
    Error { message: String },
}

impl OutboundMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
