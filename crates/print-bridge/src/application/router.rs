//! MessageRouter: turns one inbound text frame into one outbound notification.
//!
//! ```text
//! raw text ──parse──► InboundMessage ──dispatch──► PrintBackend
//!                          │                            │
//!                     InvalidMessage               result / failure
//!                     Unknown type                      │
//!                          └────────► OutboundMessage ◄─┘
//! ```
//!
//! The router never fails: every error is caught here and converted into an
//! `{"type":"error"}` notification scoped to the originating session.  It
//! holds no per-session state, so the WebSocket layer can route frames from
//! many sessions concurrently through one shared instance.

use std::sync::Arc;

use tracing::{debug, warn};

use print_bridge_core::domain::job::normalize_printer;
use print_bridge_core::{BridgeError, InboundMessage, OutboundMessage, PrintJob};

use crate::application::backend::PrintBackend;

/// Reply to a frame that is not valid JSON.
pub const INVALID_MESSAGE_REPLY: &str = "Invalid message format";

/// Reply to a frame whose `type` names no known operation.
pub const UNKNOWN_TYPE_REPLY: &str = "Unknown message type";

const LIST_FAILED_REPLY: &str = "Failed to get printers";
const PRINT_TEST_FAILED_REPLY: &str = "Failed to execute print test";
const PRINT_FAILED_REPLY: &str = "Failed to execute custom print";

/// Dispatches parsed messages to the print backend.
#[derive(Clone)]
pub struct MessageRouter {
    backend: Arc<dyn PrintBackend>,
}

impl MessageRouter {
    pub fn new(backend: Arc<dyn PrintBackend>) -> Self {
        Self { backend }
    }

    /// Handles one raw text frame received from `session_id`.
    pub async fn route(&self, session_id: &str, raw: &str) -> OutboundMessage {
        let message = match InboundMessage::parse(raw) {
            Ok(m) => m,
            Err(e) => {
                warn!("session {session_id}: {e}");
                return OutboundMessage::error(error_reply(&e, INVALID_MESSAGE_REPLY));
            }
        };

        debug!("session {session_id}: dispatching {}", message.type_name());

        match message {
            InboundMessage::GetPrinters => match self.backend.list_printers().await {
                Ok(data) => {
                    debug!("session {session_id}: sending {} printers", data.len());
                    OutboundMessage::Printers { data }
                }
                Err(e) => failure(session_id, "getPrinters", &e, LIST_FAILED_REPLY),
            },

            InboundMessage::PrintTest { printer } => {
                match self.backend.print_test_page(normalize_printer(printer)).await {
                    Ok(data) => OutboundMessage::PrintResult { data },
                    Err(e) => failure(session_id, "printTest", &e, PRINT_TEST_FAILED_REPLY),
                }
            }

            InboundMessage::Print { printer, content } => {
                let job = match PrintJob::from_parts(printer, content) {
                    Ok(job) => job,
                    Err(e) => return failure(session_id, "print", &e, PRINT_FAILED_REPLY),
                };
                match self.backend.print_text(&job).await {
                    Ok(data) => OutboundMessage::PrintResult { data },
                    Err(e) => failure(session_id, "print", &e, PRINT_FAILED_REPLY),
                }
            }

            InboundMessage::Unknown { kind } => {
                let e = BridgeError::UnknownMessageType(kind);
                warn!("session {session_id}: {e}");
                OutboundMessage::error(error_reply(&e, UNKNOWN_TYPE_REPLY))
            }
        }
    }
}

/// Logs a handler failure and builds the error notification for it.
fn failure(
    session_id: &str,
    operation: &str,
    err: &BridgeError,
    backend_reply: &str,
) -> OutboundMessage {
    warn!("session {session_id}: {operation} failed: {err}");
    OutboundMessage::error(error_reply(err, backend_reply))
}

/// User-visible text for an error.  Validation messages are passed through;
/// backend failures use the operation-specific `backend_reply`.
pub fn error_reply(err: &BridgeError, backend_reply: &str) -> String {
    match err {
        BridgeError::InvalidMessage(_) => INVALID_MESSAGE_REPLY.to_string(),
        BridgeError::UnknownMessageType(_) => UNKNOWN_TYPE_REPLY.to_string(),
        BridgeError::Validation(detail) => detail.clone(),
        BridgeError::BackendUnavailable(_) => backend_reply.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
