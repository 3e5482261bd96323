//! # print-bridge-core
//!
//! Shared library for the print bridge containing the printer domain types,
//! the JSON wire protocol spoken on the real-time channel, and the error
//! taxonomy every transport reports through.
//!
//! This crate has zero dependencies on sockets, HTTP frameworks, or OS print
//! utilities.  It is used by the `print-bridge` service and by anything that
//! wants to speak its protocol (test clients, alternative front ends).
//!
//! # Architecture overview
//!
//! - **`domain`** – What a printer, a print job, and a print result look like,
//!   the validation rule for custom print requests, and the test page
//!   template.
//!
//! - **`protocol`** – The JSON envelopes exchanged over the WebSocket channel:
//!   inbound requests (`getPrinters`, `printTest`, `print`) and outbound
//!   notifications (`welcome`, `printers`, `printResult`, `error`).
//!
//! - **`error`** – [`BridgeError`], the four failure kinds a request can end in.

pub mod domain;
pub mod error;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `print_bridge_core::PrintJob` instead of the full module path.
pub use domain::job::{PrintJob, DEFAULT_PRINTER_LABEL};
pub use domain::printer::{PrinterDescriptor, PrinterStatus};
pub use domain::result::PrintResult;
pub use error::BridgeError;
pub use protocol::messages::{InboundMessage, OutboundMessage};
