use axum::{extract::State, Extension, Json};
use coldmail_core::{classify, GenerationResult, ProfileSummary, Reference, ReferenceKind};
use serde::{Deserialize, Serialize};

use super::{map_pipeline_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct ValidateBody {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateBody {
    #[serde(default)]
    url: String,
    #[serde(default)]
    product_description: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ValidationData {
    valid: bool,
    kind: ReferenceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
    message: String,
}

#[derive(Debug, Serialize)]
pub(super) struct GeneratedData {
    email: String,
    profile: ProfileSummary,
    message: &'static str,
}

pub(super) async fn validate_url(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ValidateBody>,
) -> Json<ApiResponse<ValidationData>> {
    let reference = classify(&body.url);
    let message = match reference.kind() {
        ReferenceKind::Individual => "Valid profile reference".to_string(),
        ReferenceKind::Organization => "Valid company reference".to_string(),
        ReferenceKind::Invalid => Reference::validation_message().to_string(),
    };

    Json(ApiResponse {
        data: ValidationData {
            valid: reference.is_valid(),
            kind: reference.kind(),
            identifier: reference.identifier().map(str::to_string),
            message,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn generate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<ApiResponse<GeneratedData>>, ApiError> {
    let generated = state
        .pipeline
        .run(&body.url, &body.product_description)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: GeneratedData {
            email: generated.result.email,
            profile: generated.profile,
            message: "Email generated successfully!",
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_result(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<GenerationResult>>, ApiError> {
    let Some(result) = state.pipeline.last_result() else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "No result found. Please generate an email first.",
        ));
    };

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}
