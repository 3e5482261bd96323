//! Domain layer for print-bridge.
//!
//! Runtime configuration types with no dependencies on I/O, sockets, or
//! environment variables.  Printer, job, and protocol types live in the
//! shared `print-bridge-core` crate.

pub mod config;

pub use config::{BackendConfig, BackendStrategy, BridgeConfig, LocalBackendConfig};
