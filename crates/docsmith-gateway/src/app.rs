//! Router assembly and shared request state.

use crate::handlers;
use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use docsmith_core::{Settings, TextGenerator};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Read-only state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(settings: Settings, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            settings: Arc::new(settings),
            generator,
        }
    }
}

/// Local UI origins (any port on localhost / 127.0.0.1) may call the API from a dev server.
fn is_local_origin(origin: &HeaderValue) -> bool {
    let s = origin.to_str().unwrap_or("");
    let host = s
        .strip_prefix("http://")
        .or_else(|| s.strip_prefix("https://"))
        .unwrap_or("");
    let host = host.split(':').next().unwrap_or("");
    host == "localhost" || host == "127.0.0.1"
}

pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            is_local_origin(origin)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/", get(handlers::pages::index))
        .route("/meeting-notes", get(handlers::pages::meeting_notes_form))
        .route("/result", get(handlers::pages::result))
        .route(
            "/api/generate/meeting-notes",
            post(handlers::generate::generate_meeting_notes),
        )
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(state)
}

/// Logs method, path, status, and time to response head. Streamed bodies keep flowing after this.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        target: "docsmith::gateway",
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed = ?started.elapsed(),
        "request"
    );
    response
}
