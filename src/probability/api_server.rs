//! REST API for probability computations and their history

use anyhow::{Context, Result};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{debug, info, warn};

use super::{
    evaluator::{evaluate, FormulaError},
    models::{
        BayesInput, ComputationRecord, ConditionalInput, IntersectionInput, ProbabilityInput,
        UnionInput,
    },
    persistence::{AuditRecorder, StorageError},
};
use crate::config::ServerConfig;

/// API server exposing the probability formulas
pub struct ProbabilityApiServer {
    recorder: AuditRecorder,
    config: ServerConfig,
}

impl ProbabilityApiServer {
    pub fn new(recorder: AuditRecorder, config: ServerConfig) -> Self {
        Self { recorder, config }
    }

    /// Serve until Ctrl-C, then close the audit log
    pub async fn start(self) -> Result<()> {
        let addr = self.config.socket_addr();
        let recorder = self.recorder.clone();
        let app = self.build_router();

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("Server running on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Shutting down, closing audit log");
        recorder.close().await;
        Ok(())
    }

    /// Build API router
    pub fn build_router(self) -> Router {
        let static_dir = self.config.static_dir.clone();
        let shared_state = Arc::new(ApiState {
            recorder: self.recorder,
            default_history_limit: self.config.history_limit,
            max_history_limit: self.config.max_history_limit,
        });

        let router = Router::new()
            .route("/api/ch1/union", post(union))
            .route(
                "/api/ch1/intersection_independent",
                post(intersection_independent),
            )
            .route("/api/ch1/conditional", post(conditional))
            .route("/api/ch1/bayes", post(bayes))
            .route("/api/history", get(history))
            .route("/api/health", get(health_check))
            .with_state(shared_state);

        let router = match static_dir {
            Some(dir) if dir.is_dir() => {
                debug!("Serving static files from {}", dir.display());
                router.fallback_service(ServeDir::new(dir))
            }
            Some(dir) => {
                warn!("Static directory {} not found, skipping", dir.display());
                router
            }
            None => router,
        };

        router
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Shared API state
struct ApiState {
    recorder: AuditRecorder,
    default_history_limit: u32,
    max_history_limit: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComputeResponse {
    pub result: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

/// Failures surfaced to HTTP clients as `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(error) => (StatusCode::BAD_REQUEST, error),
            Self::Internal(error) => (StatusCode::INTERNAL_SERVER_ERROR, error),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<FormulaError> for ApiError {
    fn from(err: FormulaError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

// API Handlers

/// Validate, compute, and hand the record to the recorder without waiting
fn compute<T>(
    state: &ApiState,
    payload: std::result::Result<Json<T>, JsonRejection>,
) -> ApiResult<ComputeResponse>
where
    T: Into<ProbabilityInput>,
{
    let Json(body) = payload?;
    let input: ProbabilityInput = body.into();

    let result = evaluate(&input).inspect_err(|e| {
        debug!("Rejected {} request: {}", input.operation(), e);
    })?;

    // Detached: a failed insert is logged by the recorder and never reaches the client
    drop(state.recorder.record(input, result));

    Ok(Json(ComputeResponse { result }))
}

async fn union(
    State(state): State<Arc<ApiState>>,
    payload: std::result::Result<Json<UnionInput>, JsonRejection>,
) -> ApiResult<ComputeResponse> {
    compute(&state, payload)
}

async fn intersection_independent(
    State(state): State<Arc<ApiState>>,
    payload: std::result::Result<Json<IntersectionInput>, JsonRejection>,
) -> ApiResult<ComputeResponse> {
    compute(&state, payload)
}

async fn conditional(
    State(state): State<Arc<ApiState>>,
    payload: std::result::Result<Json<ConditionalInput>, JsonRejection>,
) -> ApiResult<ComputeResponse> {
    compute(&state, payload)
}

async fn bayes(
    State(state): State<Arc<ApiState>>,
    payload: std::result::Result<Json<BayesInput>, JsonRejection>,
) -> ApiResult<ComputeResponse> {
    compute(&state, payload)
}

async fn history(
    State(state): State<Arc<ApiState>>,
    query: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Vec<ComputationRecord>> {
    let Query(params) = query?;
    let limit = params
        .limit
        .unwrap_or(state.default_history_limit)
        .min(state.max_history_limit)
        .max(1);

    match state.recorder.recent(limit).await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            warn!("Failed to load history: {}", e);
            Err(e.into())
        }
    }
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
