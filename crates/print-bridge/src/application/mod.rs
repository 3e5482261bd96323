//! Application layer for print-bridge.
//!
//! Knows *what* to do with a request but not *how* it travels: sessions are
//! tracked, messages are routed, and print work is delegated through the
//! [`PrintBackend`] trait whose implementations live in the infrastructure
//! layer.
//!
//! # Responsibilities
//!
//! - Session bookkeeping (`session_registry`)
//! - Parsing and dispatching real-time messages (`router`)
//! - The backend seam shared by both transports (`backend`)

pub mod backend;
pub mod router;
pub mod session_registry;

pub use backend::{BackendInfo, PrintBackend};
pub use router::MessageRouter;
pub use session_registry::{SessionInfo, SessionRegistry};
