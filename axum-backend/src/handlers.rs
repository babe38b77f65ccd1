use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use dreamspace_core::{
    AspectRatio, DesignStyle, DesignTransformation, EncodedImage, PipelineStage, RoomAnalysis,
    ServiceError, StyleEntry, DESIGN_STYLES,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<PipelineStage>,
    pub request_id: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    pub style: DesignStyle,
    pub analysis: RoomAnalysis,
    #[serde(default)]
    pub custom_ideas: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub image: String,
    pub transformation: DesignTransformation,
    pub analysis: RoomAnalysis,
    #[serde(default)]
    pub custom_ideas: Option<String>,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenderResponse {
    pub image: Option<String>,
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn list_styles() -> Json<Vec<StyleEntry>> {
    Json(DESIGN_STYLES.to_vec())
}

pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<RoomAnalysis>, ApiError> {
    let request_id = Uuid::new_v4();
    info!("[{}] Received room analysis request", request_id);

    let image = validate_image(&request.image, request_id)?;
    let analysis = state
        .designer
        .analyze_room(&image)
        .await
        .map_err(|e| service_error(PipelineStage::Analyze, e, request_id))?;

    info!("[{}] Analyzed {}", request_id, analysis.room_type);
    Ok(Json(analysis))
}

pub async fn transform_handler(
    State(state): State<AppState>,
    Json(request): Json<TransformRequest>,
) -> Result<Json<DesignTransformation>, ApiError> {
    let request_id = Uuid::new_v4();
    info!("[{}] Received {} transformation request", request_id, request.style);

    let transformation = state
        .designer
        .design_transformation(request.style, &request.analysis, request.custom_ideas.as_deref())
        .await
        .map_err(|e| service_error(PipelineStage::Transform, e, request_id))?;

    Ok(Json(transformation))
}

pub async fn render_handler(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(
        "[{}] Received render request ({} at {})",
        request_id, request.transformation.style, request.aspect_ratio
    );

    let image = validate_image(&request.image, request_id)?;
    let rendered = state
        .designer
        .render_image(
            &image,
            &request.transformation,
            &request.analysis,
            request.custom_ideas.as_deref(),
            request.aspect_ratio,
        )
        .await
        .map_err(|e| service_error(PipelineStage::Render, e, request_id))?;

    if rendered.is_none() {
        warn!("[{}] Render finished without image data", request_id);
    }
    Ok(Json(RenderResponse {
        image: rendered.map(String::from),
    }))
}

/// Accept only data URIs whose bytes actually look like an image
fn validate_image(data_uri: &str, request_id: Uuid) -> Result<EncodedImage, ApiError> {
    let invalid = |message: String| {
        warn!("[{}] Rejected image: {}", request_id, message);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "INVALID_IMAGE".to_string(),
                message,
                stage: None,
                request_id: request_id.to_string(),
            }),
        )
    };

    let encoded = EncodedImage::parse(data_uri).map_err(|e| invalid(e.to_string()))?;
    let bytes = encoded.decode().map_err(|e| invalid(e.to_string()))?;
    let format =
        image::guess_format(&bytes).map_err(|e| invalid(format!("Unrecognized image data: {}", e)))?;

    info!("[{}] Image decoded, size: {} bytes ({:?})", request_id, bytes.len(), format);
    Ok(encoded)
}

fn service_error(stage: PipelineStage, err: ServiceError, request_id: Uuid) -> ApiError {
    warn!("[{}] {} failed: {}", request_id, stage, err);

    let (status, code) = match &err {
        ServiceError::InvalidImage(_) => (StatusCode::BAD_REQUEST, "INVALID_IMAGE"),
        ServiceError::Transport(_) => (StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR"),
        ServiceError::Api { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        ServiceError::MalformedResponse(_) | ServiceError::NoCandidates | ServiceError::NoImage => {
            (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE")
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: err.to_string(),
            stage: Some(stage),
            request_id: request_id.to_string(),
        }),
    )
}
