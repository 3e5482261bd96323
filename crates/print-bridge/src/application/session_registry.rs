//! SessionRegistry: in-memory bookkeeping of live real-time connections.
//!
//! Every WebSocket connection is registered on connect and unregistered on
//! close or transport error.  Each entry tracks:
//!
//! - The generated session identifier.
//! - The connection's outbound channel (drained by the socket writer task).
//! - The type tag (always `"web-client"`) and the connect time.
//!
//! # Connection lifecycle
//!
//! ```text
//! connected ──► active ──► disconnected
//!  register()    send_to()   unregister()
//! ```
//!
//! Reconnecting never resumes an old entry: a new connection always gets a
//! new identifier.  The registry is owned by the server state and lives as
//! long as the server does; nothing else stores sessions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

use print_bridge_core::OutboundMessage;

/// Type tag recorded for every real-time session.
pub const SESSION_TYPE: &str = "web-client";

/// Text of the welcome notification sent on registration.
pub const WELCOME_MESSAGE: &str = "Connected to print bridge";

/// Sending half of a session's outbound notification queue.
pub type Outbound = mpsc::UnboundedSender<OutboundMessage>;

/// Read-only projection of a session, as listed by `GET /api/clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub connected_at: DateTime<Utc>,
}

struct SessionEntry {
    info: SessionInfo,
    outbound: Outbound,
}

/// Registry of all live sessions.
///
/// Add and remove operations touch independent keys; the `RwLock` only
/// serialises access to the map itself and is never held across an await on
/// anything else.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new session and sends it the welcome notification.
    ///
    /// Returns the generated identifier.  If the welcome cannot be queued
    /// (the receiver is already gone) the session is still registered; the
    /// socket task will unregister it when it notices the closed connection.
    pub async fn register(&self, outbound: Outbound) -> String {
        let mut sessions = self.sessions.write().await;

        let id = loop {
            let candidate = generate_session_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let welcome = OutboundMessage::Welcome {
            client_id: id.clone(),
            message: WELCOME_MESSAGE.to_string(),
        };
        if outbound.send(welcome).is_err() {
            debug!("session {id}: welcome dropped, connection already closed");
        }

        sessions.insert(
            id.clone(),
            SessionEntry {
                info: SessionInfo {
                    id: id.clone(),
                    kind: SESSION_TYPE,
                    connected_at: Utc::now(),
                },
                outbound,
            },
        );

        id
    }

    /// Removes a session.  Removing an unknown id is a no-op.
    ///
    /// Returns `true` if an entry was removed.
    pub async fn unregister(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Snapshot of all live sessions, oldest first.
    pub async fn list(&self) -> Vec<SessionInfo> {
        let mut infos: Vec<SessionInfo> = self
            .sessions
            .read()
            .await
            .values()
            .map(|entry| entry.info.clone())
            .collect();
        infos.sort_by(|a, b| a.connected_at.cmp(&b.connected_at).then_with(|| a.id.cmp(&b.id)));
        infos
    }

    /// Queues `message` for exactly one session.
    ///
    /// Returns `false` if the session is unknown or its connection is gone.
    pub async fn send_to(&self, id: &str, message: OutboundMessage) -> bool {
        match self.sessions.read().await.get(id) {
            Some(entry) => entry.outbound.send(message).is_ok(),
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Generates `client-<9 hex chars>-<unix millis>`.
///
/// The random part comes from a v4 UUID; the timestamp keeps ids roughly
/// ordered by connect time when read in logs.
pub fn generate_session_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("client-{}-{}", &random[..9], Utc::now().timestamp_millis())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
