//! Design Handlers
//!
//! HTTP handlers for fitting, managing and applying treatment designs.
//! All endpoints require JWT authentication.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::design::DesignId;
use crate::infrastructure::driving_adapters::api_rest::dto::{
    CreateDesignDto, DesignResponseDto, PatchDesignDto, PlanPreviewDto, PreviewDesignDto, RefitDesignDto,
    TransformDatasetDto,
};
use crate::infrastructure::driving_adapters::api_rest::middleware::auth::JwtAuth;
use crate::infrastructure::driving_adapters::api_rest::AppState;
use crate::shared::errors::ApiError;

/// Create the router for design endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_design).get(get_active_designs))
        .route("/preview", post(preview_design))
        .route(
            "/{id}",
            get(get_design_by_id)
                .put(refit_design)
                .patch(partial_update_design)
                .delete(delete_design),
        )
        .route("/{id}/transform", post(transform_dataset))
}

fn parse_id(id: &str) -> Result<DesignId, ApiError> {
    Ok(DesignId::from_uuid(Uuid::parse_str(id)?))
}

/// POST /designs - Fit and store a new design
///
/// # Responses
///
/// * 201 Created - Design fitted and stored
/// * 400 Bad Request - Validation error or unreadable dataset
/// * 401 Unauthorized - Missing or invalid JWT token
/// * 409 Conflict - An active design already uses the name
/// * 422 Unprocessable Entity - The dataset cannot be fitted with these settings
#[axum::debug_handler]
async fn create_design(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Json(dto): Json<CreateDesignDto>,
) -> Result<(StatusCode, Json<DesignResponseDto>), ApiError> {
    dto.validate()?;

    let (data, dataset) = dto.into_parts();
    let frame = state.load_dataset_use_case.execute(dataset.into()).await?;
    let design = state.create_design_use_case.execute(data, &frame).await?;

    Ok((StatusCode::CREATED, Json(DesignResponseDto::from(design))))
}

/// POST /designs/preview - Fit without storing
///
/// # Responses
///
/// * 200 OK - Fitted plan
/// * 400 Bad Request - Validation error or unreadable dataset
/// * 401 Unauthorized - Missing or invalid JWT token
#[axum::debug_handler]
async fn preview_design(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Json(dto): Json<PreviewDesignDto>,
) -> Result<Json<PlanPreviewDto>, ApiError> {
    dto.validate()?;

    let frame = state.load_dataset_use_case.execute(dto.dataset.into()).await?;
    let plan = state.preview_design_use_case.execute(&dto.settings.into(), &frame)?;

    Ok(Json(PlanPreviewDto::from(plan)))
}

/// GET /designs - All active designs, sorted by name
#[axum::debug_handler]
async fn get_active_designs(
    _auth: JwtAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<DesignResponseDto>>, ApiError> {
    let designs = state.get_active_designs_use_case.execute().await?;

    Ok(Json(designs.iter().map(DesignResponseDto::from).collect()))
}

/// GET /designs/{id} - A design by ID
///
/// # Responses
///
/// * 200 OK - Design found
/// * 401 Unauthorized - Missing or invalid JWT token
/// * 404 Not Found - Design does not exist
#[axum::debug_handler]
async fn get_design_by_id(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DesignResponseDto>, ApiError> {
    let design_id = parse_id(&id)?;

    let design = state.get_design_by_id_use_case.execute(&design_id).await?;

    Ok(Json(DesignResponseDto::from(design)))
}

/// PUT /designs/{id} - Refit a design with new settings and data
///
/// # Responses
///
/// * 200 OK - Design refitted
/// * 400 Bad Request - Validation error or unreadable dataset
/// * 401 Unauthorized - Missing or invalid JWT token
/// * 404 Not Found - Design does not exist
/// * 409 Conflict - Another active design already uses the name
#[axum::debug_handler]
async fn refit_design(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<RefitDesignDto>,
) -> Result<Json<DesignResponseDto>, ApiError> {
    dto.validate()?;
    let design_id = parse_id(&id)?;

    let (data, dataset) = dto.into_parts();
    let frame = state.load_dataset_use_case.execute(dataset.into()).await?;
    let design = state.refit_design_use_case.execute(&design_id, data, &frame).await?;

    Ok(Json(DesignResponseDto::from(design)))
}

/// PATCH /designs/{id} - Rename, describe or (de)activate a design
///
/// # Responses
///
/// * 200 OK - Design updated
/// * 400 Bad Request - Validation error
/// * 401 Unauthorized - Missing or invalid JWT token
/// * 404 Not Found - Design does not exist
/// * 409 Conflict - Another active design already uses the name
#[axum::debug_handler]
async fn partial_update_design(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<PatchDesignDto>,
) -> Result<Json<DesignResponseDto>, ApiError> {
    dto.validate()?;
    let design_id = parse_id(&id)?;

    let design = state
        .partial_update_design_use_case
        .execute(&design_id, dto.into())
        .await?;

    Ok(Json(DesignResponseDto::from(design)))
}

/// DELETE /designs/{id} - Soft delete a design
///
/// # Responses
///
/// * 204 No Content - Design deleted
/// * 401 Unauthorized - Missing or invalid JWT token
/// * 404 Not Found - Design does not exist
#[axum::debug_handler]
async fn delete_design(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let design_id = parse_id(&id)?;

    state.delete_design_use_case.execute(&design_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /designs/{id}/transform - Apply a stored design to a dataset
///
/// The treated table is returned as CSV or column JSON depending on `output`.
///
/// # Responses
///
/// * 200 OK - Treated table
/// * 400 Bad Request - Validation error, unreadable dataset or inactive design
/// * 401 Unauthorized - Missing or invalid JWT token
/// * 404 Not Found - Design does not exist
/// * 422 Unprocessable Entity - A treated column is missing from the dataset
#[axum::debug_handler]
async fn transform_dataset(
    _auth: JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<TransformDatasetDto>,
) -> Result<Response, ApiError> {
    dto.validate()?;
    let design_id = parse_id(&id)?;

    let frame = state.load_dataset_use_case.execute(dto.dataset.into()).await?;
    let treated = state.transform_dataset_use_case.execute(&design_id, &frame).await?;
    let body = state.encode_dataset_use_case.execute(&treated, dto.output)?;

    Ok(([(header::CONTENT_TYPE, dto.output.content_type())], body).into_response())
}
