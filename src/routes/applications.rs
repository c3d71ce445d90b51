//! Application package route handlers

use crate::error::{ApiResult, AppError};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

/// Parsed application package of catalog entry `application`
pub async fn get_application(
    State(state): State<SharedState>,
    Path(application): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let catalog = state.catalog.as_ref().ok_or_else(|| {
        AppError::Config("RESOURCE_CATALOG_METADATA_URL is not configured".to_string())
    })?;

    debug!("Fetching application {}", application);
    Ok(Json(catalog.fetch_application(&application).await?))
}
