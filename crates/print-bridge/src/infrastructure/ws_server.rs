//! WebSocket sessions: one per upgraded connection.
//!
//! Each session runs three kinds of task:
//!
//! 1. **Reader** (the upgrade task itself): reads frames until the client
//!    closes the connection or the transport fails.
//! 2. **Writer**: owns the socket sink and drains the session's outbound
//!    queue, so notifications for one session are written in order.
//! 3. **Routing**: every inbound text frame is routed in its own task, so a
//!    slow backend call only delays its own reply.  A session may have at
//!    most [`MAX_IN_FLIGHT_PER_SESSION`] routing tasks outstanding; past that
//!    the reader stops pulling frames until one finishes.
//!
//! ```text
//! client ──frame──► reader ──spawn──► MessageRouter::route
//!                                          │
//!                               SessionRegistry::send_to(id)
//!                                          │
//! client ◄──frame── writer ◄──mpsc──────────┘
//! ```
//!
//! Registration sends the welcome notification; the session is unregistered
//! as soon as the reader stops, and its outstanding routing tasks are
//! aborted.

use std::future::Future;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use print_bridge_core::OutboundMessage;

use crate::infrastructure::http_api::AppState;

/// Routing tasks one session may have outstanding before its reader pauses.
pub const MAX_IN_FLIGHT_PER_SESSION: usize = 32;

/// Bounded set of routing tasks owned by one session.
struct InFlight {
    tasks: JoinSet<()>,
    limit: usize,
}

impl InFlight {
    fn new(limit: usize) -> Self {
        Self {
            tasks: JoinSet::new(),
            limit: limit.max(1),
        }
    }

    /// Spawns `task`, first waiting for a slot while the set is full.
    async fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        while let Some(done) = self.tasks.try_join_next() {
            log_join(done);
        }
        while self.tasks.len() >= self.limit {
            match self.tasks.join_next().await {
                Some(done) => log_join(done),
                None => break,
            }
        }
        self.tasks.spawn(task);
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Aborts every task that has not finished yet.
    fn shutdown(&mut self) {
        self.tasks.abort_all();
    }
}

fn log_join(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!("routing task panicked: {e}");
        }
    }
}

/// Upgrades `GET /` and `GET /ws` into a session.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs the complete lifecycle of one session.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound, mut queue) = mpsc::unbounded_channel::<OutboundMessage>();

    let session_id = state.registry.register(outbound).await;
    info!(
        "session {session_id} connected ({} live)",
        state.registry.len().await
    );

    // ── Writer ────────────────────────────────────────────────────────────────
    //
    // Ends when the registry drops the session's sender or the socket fails.
    let writer_id = session_id.clone();
    let writer = tokio::spawn(async move {
        while let Some(message) = queue.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    error!("session {writer_id}: failed to serialise notification: {e}");
                    continue;
                }
            };
            if let Err(e) = ws_tx.send(Message::Text(text.into())).await {
                debug!("session {writer_id}: write failed: {e}");
                break;
            }
        }
    });

    // ── Reader ────────────────────────────────────────────────────────────────
    let mut in_flight = InFlight::new(MAX_IN_FLIGHT_PER_SESSION);
    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let router = state.router.clone();
                let registry = Arc::clone(&state.registry);
                let id = session_id.clone();
                let raw = text.as_str().to_owned();

                in_flight
                    .spawn(async move {
                        let reply = router.route(&id, &raw).await;
                        if !registry.send_to(&id, reply).await {
                            debug!("session {id}: reply dropped, session already closed");
                        }
                    })
                    .await;
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_)) => {
                debug!("session {session_id}: ignoring binary frame");
            }
            // Pings are answered by axum.
            Ok(_) => {}
            Err(e) => {
                warn!("session {session_id}: transport error: {e}");
                break;
            }
        }
    }

    if in_flight.len() > 0 {
        debug!(
            "session {session_id}: aborting {} routing tasks",
            in_flight.len()
        );
    }
    in_flight.shutdown();
    state.registry.unregister(&session_id).await;
    if writer.await.is_err() {
        debug!("session {session_id}: writer task aborted");
    }
    info!(
        "session {session_id} disconnected ({} live)",
        state.registry.len().await
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
