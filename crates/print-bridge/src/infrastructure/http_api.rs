//! HTTP façade: request/response access to the same operations as the
//! real-time channel, plus diagnostics.
//!
//! | Method | Path              | Response                                        |
//! |--------|-------------------|-------------------------------------------------|
//! | GET    | `/api/status`     | `{status:"running", clients, uptime, backend}`  |
//! | GET    | `/api/clients`    | `[{id, type, connectedAt}]`                     |
//! | GET    | `/api/printers`   | `{status:"success", printers, count, ...}`      |
//! | GET    | `/api/print-test` | `PrintResult` (`?printer=` optional)            |
//! | POST   | `/api/print`      | `PrintResult` (body `{printer?, content}`)      |
//! | GET    | `/`, `/ws`        | WebSocket upgrade into a session                |
//!
//! Failures use the envelope `{"status":"error","message":...}` with 400 for
//! bad requests and 502 when the backend is unavailable.  A job the printer
//! refused is still a 200 carrying `success: false`.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use print_bridge_core::domain::job::normalize_printer;
use print_bridge_core::{BridgeError, PrintJob, PrintResult, PrinterDescriptor};

use crate::application::backend::{BackendInfo, PrintBackend};
use crate::application::router::error_reply;
use crate::application::{MessageRouter, SessionInfo, SessionRegistry};
use crate::infrastructure::ws_server::ws_handler;

const LIST_FAILED: &str = "Failed to get printers";
const PRINT_TEST_FAILED: &str = "Failed to execute print test";
const PRINT_FAILED: &str = "Failed to execute custom print";

/// Shared state handed to every handler and WebSocket session.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub router: MessageRouter,
    pub backend: Arc<dyn PrintBackend>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(backend: Arc<dyn PrintBackend>) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            router: MessageRouter::new(Arc::clone(&backend)),
            backend,
            started_at: Instant::now(),
        }
    }
}

/// Builds the complete HTTP + WebSocket application.
///
/// When `static_dir` is set, paths no route matches are served from it.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/api/status", get(status_handler))
        .route("/api/clients", get(clients_handler))
        .route("/api/printers", get(printers_handler))
        .route("/api/print-test", get(print_test_handler))
        .route("/api/print", post(print_handler));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Error envelope ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

/// An HTTP failure: status code plus the message placed in the envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Maps a handler failure; `backend_reply` is used for backend errors.
    fn from_bridge(err: &BridgeError, backend_reply: &str) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::BAD_GATEWAY
        };
        Self {
            status,
            message: error_reply(err, backend_reply),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    clients: usize,
    /// Seconds since start-up.
    uptime: f64,
    backend: BackendInfo,
}

async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        clients: state.registry.len().await,
        uptime: state.started_at.elapsed().as_secs_f64(),
        backend: state.backend.describe(),
    })
}

async fn clients_handler(State(state): State<AppState>) -> Json<Vec<SessionInfo>> {
    Json(state.registry.list().await)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrintersResponse {
    status: &'static str,
    count: usize,
    printers: Vec<PrinterDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_printer: Option<String>,
}

async fn printers_handler(
    State(state): State<AppState>,
) -> Result<Json<PrintersResponse>, ApiError> {
    let printers = state.backend.list_printers().await.map_err(|e| {
        warn!("GET /api/printers failed: {e}");
        ApiError::from_bridge(&e, LIST_FAILED)
    })?;

    let default_printer = printers
        .iter()
        .find(|p| p.is_default)
        .map(|p| p.name.clone());

    Ok(Json(PrintersResponse {
        status: "success",
        count: printers.len(),
        printers,
        default_printer,
    }))
}

#[derive(Debug, Deserialize)]
struct PrintTestQuery {
    printer: Option<String>,
}

async fn print_test_handler(
    State(state): State<AppState>,
    Query(query): Query<PrintTestQuery>,
) -> Result<Json<PrintResult>, ApiError> {
    state
        .backend
        .print_test_page(normalize_printer(query.printer))
        .await
        .map(Json)
        .map_err(|e| {
            warn!("GET /api/print-test failed: {e}");
            ApiError::from_bridge(&e, PRINT_TEST_FAILED)
        })
}

#[derive(Debug, Deserialize)]
struct PrintRequest {
    printer: Option<String>,
    content: Option<String>,
}

async fn print_handler(
    State(state): State<AppState>,
    body: Result<Json<PrintRequest>, JsonRejection>,
) -> Result<Json<PrintResult>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        warn!("POST /api/print rejected: {rejection}");
        ApiError::bad_request(rejection.body_text())
    })?;

    let job = PrintJob::from_parts(request.printer, request.content)
        .map_err(|e| ApiError::from_bridge(&e, PRINT_FAILED))?;

    state.backend.print_text(&job).await.map(Json).map_err(|e| {
        warn!("POST /api/print failed: {e}");
        ApiError::from_bridge(&e, PRINT_FAILED)
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
