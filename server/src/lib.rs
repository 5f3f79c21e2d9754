use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, routing::{get, post}, Json, Router};
use rag_core::{PipelineError, QueryPipeline, QueryRequest, QueryResponse};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<QueryPipeline>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Maps pipeline failures onto HTTP statuses: bad input is 400, any
/// collaborator failure is 500.
pub struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self { Self(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorBody { detail: self.0.to_string() })).into_response()
    }
}

pub fn build_app(pipeline: QueryPipeline) -> Router {
    let app_state = AppState { pipeline: Arc::new(pipeline) };

    Router::new()
        .route("/health", get(health_handler))
        .route("/query", post(query_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref()))
}

/// CORS from a comma-separated origin list; unset or unparsable allows any origin.
pub fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let origins: Vec<_> = allow_origin
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn query_handler(State(state): State<AppState>, Json(request): Json<QueryRequest>) -> Result<Json<QueryResponse>, ApiError> {
    let start = std::time::Instant::now();
    let response = state.pipeline.handle(&request).await?;
    tracing::info!(results = response.results.len(), took_s = start.elapsed().as_secs_f64(), "query answered");
    Ok(Json(response))
}
