//! Infrastructure layer for print-bridge.
//!
//! Everything that touches the outside world lives here: the HTTP and
//! WebSocket listener, the print backend strategies, and the optional
//! configuration file.
//!
//! # Responsibilities
//!
//! - Serving the HTTP façade and upgrading WebSocket sessions (`http_api`,
//!   `ws_server`)
//! - Talking to a remote print service over HTTP (`remote_backend`)
//! - Running the host's spooler commands (`local_backend`)
//! - Serving canned printers without printing (`mock_backend`)
//! - Reading the TOML configuration file (`config_file`)
//! - Binding the listener and handling graceful shutdown (`server`)
//!
//! # What does NOT belong here?
//!
//! - Message parsing and dispatch (that is the application layer)
//! - Wire types and validation (that is `print-bridge-core`)
//! - Command-line parsing (that is done in `main.rs`)

pub mod config_file;
pub mod http_api;
pub mod local_backend;
pub mod mock_backend;
pub mod remote_backend;
pub mod server;
pub mod ws_server;

pub use server::run_server;
