//! print-bridge library crate.
//!
//! Lets browser clients list and use the host's printers over a WebSocket
//! channel or a small HTTP API, delegating the actual printing to either a
//! remote print service or the local spooler.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (JSON over WebSocket / HTTP)
//!         ↕
//! [print-bridge]
//!   ├── domain/           BridgeConfig, backend strategy selection
//!   ├── application/      SessionRegistry, MessageRouter, PrintBackend trait
//!   └── infrastructure/
//!         ├── http_api/       axum routes, error envelope
//!         ├── ws_server/      per-session reader/writer tasks
//!         ├── remote_backend/ HTTP print service (reqwest)
//!         ├── local_backend/  lp / lpstat
//!         └── config_file/    optional TOML file
//!         ↕
//! Print service or OS spooler
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `print-bridge-core` only.
//! - `infrastructure` depends on all other layers plus `axum`, `reqwest`,
//!   and `tokio::process`.

/// Domain layer: runtime configuration types.
pub mod domain;

/// Application layer: sessions, routing, and the backend seam.
pub mod application;

/// Infrastructure layer: HTTP/WebSocket server and backend strategies.
pub mod infrastructure;
