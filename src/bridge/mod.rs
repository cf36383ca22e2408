// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

//! The bridge server: a loopback HTTP command channel over one live document.
//!
//! Three routes. `GET /status` reports liveness, `POST /execute` dispatches a
//! command, `POST /stop` shuts the listener down. Every response is JSON and
//! carries permissive CORS headers so browser-hosted callers on other local
//! ports can reach the bridge. The document sits behind one async mutex:
//! commands are applied strictly one at a time, in arrival order.

use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::command::{self, CommandRequest, StatusReply, StopReply};
use crate::model::Document;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8765;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const STOP_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const STACK_FRAME_LIMIT: usize = 5;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    document: Arc<Mutex<Document>>,
    shutdown: CancellationToken,
    debug_traces: bool,
}

impl AppState {
    pub fn new(document: Document, debug_traces: bool) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
            shutdown: CancellationToken::new(),
            debug_traces,
        }
    }

    pub fn document(&self) -> &Arc<Mutex<Document>> {
        &self.document
    }

    /// Cancelled once `POST /stop` has been accepted.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

#[derive(Debug)]
pub enum BridgeError {
    Bind {
        addr: String,
        source: std::io::Error,
    },
    Serve {
        source: std::io::Error,
    },
    StopRequest {
        url: String,
        source: reqwest::Error,
    },
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, .. } => write!(f, "failed to bind {addr}"),
            Self::Serve { .. } => f.write_str("bridge server failed"),
            Self::StopRequest { url, .. } => write!(f, "stop request to {url} failed"),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } | Self::Serve { source } => Some(source),
            Self::StopRequest { source, .. } => Some(source),
        }
    }
}

impl BridgeError {
    /// True when binding failed because another instance already holds the
    /// port. The caller may then ask that instance to stop and retry.
    pub fn is_addr_in_use(&self) -> bool {
        matches!(
            self,
            Self::Bind { source, .. } if source.kind() == std::io::ErrorKind::AddrInUse
        )
    }
}

/// Owns the listening socket. Bind first, read the resolved address, then
/// hand the handle to `serve`; cancelling the shutdown token (which
/// `POST /stop` does) ends `serve` gracefully.
pub struct BridgeServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: AppState,
}

impl BridgeServer {
    pub async fn bind(addr: &str, state: AppState) -> Result<Self, BridgeError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| BridgeError::Bind {
                addr: addr.to_owned(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| BridgeError::Bind {
            addr: addr.to_owned(),
            source,
        })?;
        Ok(Self {
            listener,
            local_addr,
            state,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serves until the shutdown token fires, then drains in-flight requests.
    pub async fn serve(self) -> Result<(), BridgeError> {
        let shutdown = self.state.shutdown.clone();
        let app = router(self.state);
        info!("bridge listening on http://{}", self.local_addr);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
            .map_err(|source| BridgeError::Serve { source })?;
        info!("bridge stopped");
        Ok(())
    }
}

/// Builds the command-channel router with the full middleware stack. CORS
/// sits outermost so that even 404/405 replies carry the headers.
pub fn router(state: AppState) -> Router {
    let debug_traces = state.debug_traces;
    Router::new()
        .route("/status", get(status).fallback(method_not_allowed))
        .route("/execute", post(execute).fallback(method_not_allowed))
        .route("/stop", post(stop).fallback(method_not_allowed))
        .fallback(unknown_path)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| {
                let message = panic_message(panic.as_ref());
                error!("handler panicked: {message}");
                internal_error(&message, debug_traces)
            },
        ))
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn status(State(state): State<AppState>) -> Json<StatusReply> {
    let doc = state.document.lock().await;
    Json(StatusReply {
        status: "running".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        map_title: doc.title().to_owned(),
        current_node: doc.selected_id().as_str().to_owned(),
    })
}

async fn execute(State(state): State<AppState>, body: Bytes) -> Response {
    let request: CommandRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            debug!("rejecting unreadable request body: {err}");
            return internal_error(&err.to_string(), state.debug_traces);
        }
    };

    debug!("dispatching {}", request.command);
    let mut doc = state.document.lock().await;
    match command::dispatch(&mut doc, &request) {
        Ok(reply) => Json(reply).into_response(),
        Err(err) => {
            debug!("{} rejected: {err}", request.command);
            // Domain failures still answer 200; the error lives in the body.
            Json(err.to_body()).into_response()
        }
    }
}

async fn stop(State(state): State<AppState>) -> Json<StopReply> {
    info!("stop requested");
    state.shutdown.cancel();
    Json(StopReply {
        status: "stopping".to_owned(),
    })
}

/// Known path, wrong method. OPTIONS is always a bare 200 for preflight.
async fn method_not_allowed(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed", "status": 405 })),
    )
        .into_response()
}

async fn unknown_path(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "status": 404 })),
    )
        .into_response()
}

fn internal_error(message: &str, debug_traces: bool) -> Response {
    let mut body = json!({ "error": message });
    if debug_traces {
        body["stackTrace"] = json!(capture_frames(STACK_FRAME_LIMIT));
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else {
        "unexpected panic".to_owned()
    }
}

/// Symbol lines of the current backtrace, newest first.
fn capture_frames(limit: usize) -> Vec<String> {
    Backtrace::force_capture()
        .to_string()
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.split_once(':')
                .is_some_and(|(index, _)| index.trim().parse::<usize>().is_ok())
        })
        .take(limit)
        .map(str::to_owned)
        .collect()
}

/// Asks a bridge instance on `host:port` to stop. Used by the entry point
/// when its own bind finds the port occupied by a previous instance.
pub async fn request_stop(host: &str, port: u16) -> Result<StopReply, BridgeError> {
    let url = format!("http://{host}:{port}/stop");
    let stop_failed = |source| BridgeError::StopRequest {
        url: url.clone(),
        source,
    };
    let client = reqwest::Client::builder()
        .timeout(STOP_REQUEST_TIMEOUT)
        .build()
        .map_err(stop_failed)?;
    let reply = client
        .post(&url)
        .send()
        .await
        .map_err(stop_failed)?
        .json::<StopReply>()
        .await
        .map_err(stop_failed)?;
    Ok(reply)
}
