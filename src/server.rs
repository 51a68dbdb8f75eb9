// src/server.rs
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::coordinator::{Coordinator, RequestContext};
use crate::error::ApiError;
use crate::memory::CacheStats;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::types::{AnalysisRequest, AnalysisResponse, HealthReport};

pub const TRACE_HEADER: &str = "x-trace-id";

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator: Arc::new(coordinator), metrics: Arc::new(Metrics::default()) }
    }
}

async fn with_trace_id(mut req: Request, next: Next) -> Response {
    let ctx = RequestContext::new();
    let header = HeaderValue::from_str(&ctx.trace_id).ok();
    req.extensions_mut().insert(ctx);
    let mut resp = next.run(req).await;
    if let Some(value) = header {
        resp.headers_mut().insert(TRACE_HEADER, value);
    }
    resp
}

pub async fn analyze(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(req) = payload?;
    let topic = req
        .validated_topic()
        .ok_or_else(|| ApiError::BadRequest("topic must be 1-200 characters".into()))?
        .to_string();

    let started = Instant::now();
    info!(trace_id = %ctx.trace_id, topic = %topic, "analysis request");
    state.metrics.analysis_requests_total.inc();

    let claims = match state.coordinator.analyze(&ctx, &topic).await {
        Ok(claims) => claims,
        Err(e) => {
            state.metrics.analysis_errors_total.inc();
            error!(trace_id = %ctx.trace_id, topic = %topic, error = %e, "analysis failed");
            return Err(e.into());
        }
    };

    let elapsed = started.elapsed();
    state.metrics.analysis_duration_seconds.observe(elapsed);
    state.metrics.claims_analyzed_total.add(claims.len() as u64);

    let resp = AnalysisResponse::new(topic, claims, elapsed.as_secs_f64());
    if resp.cached {
        state.metrics.cache_hits_total.inc();
    }
    info!(
        trace_id = %ctx.trace_id,
        topic = %resp.topic,
        claims = resp.claims.len(),
        duration_ms = elapsed.as_secs_f64() * 1000.0,
        cached = resp.cached,
        "analysis complete"
    );
    Ok(Json(resp))
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "misinfo-guard",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "analyze": "POST /analyze",
            "health": "GET /health",
            "metrics": "GET /metrics",
            "memory": "GET /memory/stats"
        }
    }))
}

async fn health() -> Json<HealthReport> {
    Json(HealthReport::current())
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn memory_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.coordinator.cache_stats())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/memory/stats", get(memory_stats))
        .layer(middleware::from_fn(with_trace_id))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
