//! HTTP surface for the analysis engine.
//!
//! Two handlers, both thin: full analysis and a metadata-only summary. All
//! responses are field-keyed JSON documents; top-level failures map to HTTP
//! status codes with a machine-readable error kind.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tracing::info;

use crate::engine::ContractAnalyzer;
use crate::error::AnalysisError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    kind: &'static str,
    message: String,
}

struct ApiError(AnalysisError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            AnalysisError::InvalidAddress(_) => (StatusCode::BAD_REQUEST, "invalid_address"),
            AnalysisError::MetadataUnavailable(_) => {
                (StatusCode::BAD_GATEWAY, "metadata_unavailable")
            }
        };
        let body = ErrorBody {
            error: ErrorDetail {
                kind,
                message: self.0.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

async fn analyze_handler(
    State(analyzer): State<Arc<ContractAnalyzer>>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let report = analyzer.analyze(&address).await.map_err(ApiError)?;
    Ok(Json(report))
}

async fn summary_handler(
    State(analyzer): State<Arc<ContractAnalyzer>>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = analyzer.summary(&address).await.map_err(ApiError)?;
    Ok(Json(summary))
}

pub fn router(analyzer: Arc<ContractAnalyzer>) -> Router {
    Router::new()
        .route("/contracts/:address", get(analyze_handler))
        .route("/contracts/:address/summary", get(summary_handler))
        .with_state(analyzer)
}

/// Serve the API until the process is stopped.
pub async fn serve(analyzer: Arc<ContractAnalyzer>, port: u16) -> anyhow::Result<()> {
    let app = router(analyzer);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(
        target: "contract_inspector::server",
        port,
        "HTTP API listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
