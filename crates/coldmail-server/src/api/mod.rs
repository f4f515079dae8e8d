mod outreach;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use coldmail_apify::ApifyError;
use coldmail_pipeline::{Pipeline, PipelineError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Pipeline stage that failed; absent for errors outside a pipeline run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<&'static str>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                step: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_step(mut self, step: &'static str) -> Self {
        self.error.step = Some(step);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" | "profile_not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" | "invalid_reference" => StatusCode::BAD_REQUEST,
            "provider_timeout" => StatusCode::GATEWAY_TIMEOUT,
            "retrieval_failed" | "generation_unavailable" | "generation_format" => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Renders a pipeline failure with a code specific to its kind.
pub(super) fn map_pipeline_error(request_id: String, error: &PipelineError) -> ApiError {
    let code = match error {
        PipelineError::InvalidReference { .. } => "invalid_reference",
        PipelineError::InvalidProduct(_) => "validation_error",
        PipelineError::Retrieval(ApifyError::NotFound { .. }) => "profile_not_found",
        PipelineError::Retrieval(e) if e.is_timeout() => "provider_timeout",
        PipelineError::Retrieval(_) => "retrieval_failed",
        PipelineError::GenerationService(_) => "generation_unavailable",
        PipelineError::GenerationFormat(_) => "generation_format",
    };
    if matches!(
        error,
        PipelineError::InvalidReference { .. } | PipelineError::InvalidProduct(_)
    ) {
        tracing::info!(error = %error, code, "request rejected");
    } else {
        tracing::error!(error = %error, code, step = error.step(), "pipeline run failed");
    }
    ApiError::new(request_id, code, error.user_message()).with_step(error.step())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/validate-url", post(outreach::validate_url))
        .route("/api/generate", post(outreach::generate))
        .route("/api/get-result", get(outreach::get_result))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests;
