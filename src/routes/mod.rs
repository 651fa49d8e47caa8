use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    Json, Router,
    extract::{MatchedPath, State},
    middleware,
    routing::get,
};
use serde::Serialize;
use tower_http::trace::{MakeSpan, OnRequest, OnResponse, TraceLayer};
use tracing::{Span, field, instrument};

use crate::{
    api::{self, ApiResult},
    config::AppConfig,
    services::albums::AlbumService,
};

/// Shared application state cloned into each request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub albums: Arc<AlbumService>,
    pub boot_instant: Instant,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, albums: Arc<AlbumService>) -> Self {
        Self {
            config,
            albums,
            boot_instant: Instant::now(),
        }
    }
}

/// Build the Axum router with shared layers and routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/albums/{album_id}", get(api::albums::get_album))
        .with_state(state)
        .fallback(api::fallback_handler)
        .layer(middleware::from_fn(api::ensure_error_envelope))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(HttpMakeSpan)
                .on_request(LogOnRequest)
                .on_response(LogOnResponse),
        )
}

/// JSON payload returned by `/healthz`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    upstream_base_url: String,
    environment: String,
    uptime_seconds: f64,
}

#[instrument(skip(state))]
async fn healthz(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok",
        upstream_base_url: state.config.upstream.base_url.to_string(),
        environment: state.config.environment.clone(),
        uptime_seconds: state.boot_instant.elapsed().as_secs_f64(),
    }))
}

#[derive(Clone)]
struct HttpMakeSpan;

impl<B> MakeSpan<B> for HttpMakeSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let method = request.method().clone();
        let matched_path = request
            .extensions()
            .get::<MatchedPath>()
            .map(|path| path.as_str())
            .unwrap_or_else(|| request.uri().path());

        let span = tracing::info_span!(
            "http_request",
            http.request.method = %method,
            http.route = %matched_path,
            url.path = request.uri().path(),
            url.query = field::Empty,
            http.response.status_code = field::Empty,
            http.latency_ms = field::Empty
        );

        if let Some(query) = request.uri().query() {
            span.record("url.query", &field::display(query));
        }

        span
    }
}

#[derive(Clone)]
struct LogOnRequest;

impl<B> OnRequest<B> for LogOnRequest {
    fn on_request(&mut self, request: &axum::http::Request<B>, span: &Span) {
        tracing::info!(
            parent: span,
            "HTTP request received: {} {}",
            request.method(),
            request.uri().path()
        );
    }
}

#[derive(Clone)]
struct LogOnResponse;

impl<B> OnResponse<B> for LogOnResponse {
    fn on_response(self, response: &axum::http::Response<B>, latency: Duration, span: &Span) {
        let status_code = response.status().as_u16();

        span.record("http.response.status_code", &field::display(status_code));
        span.record("http.latency_ms", &field::display(latency.as_millis()));

        tracing::info!(
            parent: span,
            "HTTP request completed with status {} in {} ms",
            status_code,
            latency.as_millis()
        );
    }
}
