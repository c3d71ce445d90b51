//! Catalog item route handlers
//!
//! Every mutation becomes a change proposal in the catalog repository;
//! nothing here touches the published catalog directly.

use crate::auth::Caller;
use crate::error::{validation_error, ApiResult, AppError};
use crate::models::{MessageResponse, SuccessResponse};
use crate::proposal::{ChangeProposal, ChangeSubmission, ChangeType};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::{Validate, ValidationError};

/// `/item-requests/{item_type}/{filename}`
#[derive(Debug, Deserialize, Validate)]
pub struct ItemPath {
    #[validate(length(min = 1, max = 64))]
    pub item_type: String,

    #[validate(length(min = 1, max = 255), custom(function = "validate_filename"))]
    pub filename: String,
}

/// Body of add and update requests
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    /// The STAC item, stored pretty-printed
    pub stac: serde_json::Value,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub reviewers: Vec<String>,
}

#[derive(Serialize)]
pub struct ProposalListResponse {
    pub items: Vec<ChangeProposal>,
}

#[derive(Serialize)]
pub struct ItemListResponse {
    pub items: Vec<String>,
}

/// File names must stay inside their item directory
fn validate_filename(filename: &str) -> Result<(), ValidationError> {
    if filename.starts_with('.') || filename.contains(['/', '\\']) {
        return Err(ValidationError::new("filename"));
    }
    Ok(())
}

fn checked_path(state: &SharedState, path: ItemPath) -> ApiResult<ItemPath> {
    path.validate().map_err(|e| validation_error(e.to_string()))?;
    state.ensure_item_type(&path.item_type)?;
    Ok(path)
}

async fn submit(
    state: &SharedState,
    caller: Caller,
    path: ItemPath,
    change_type: ChangeType,
    request: Option<ItemRequest>,
) -> ApiResult<()> {
    let path = checked_path(state, path)?;

    let (content, assignees, reviewers) = match request {
        Some(request) => {
            let content = serde_json::to_vec_pretty(&request.stac)
                .map_err(|e| AppError::Internal(format!("Failed to serialize item: {}", e)))?;
            (Some(content), request.assignees, request.reviewers)
        }
        None => (None, Vec::new(), Vec::new()),
    };

    debug!(
        "{} request for {}/{} by {} (data owner: {})",
        change_type, path.item_type, path.filename, caller.user, caller.data_owner
    );

    state
        .proposals
        .submit_change(ChangeSubmission {
            item_type: path.item_type,
            filename: path.filename,
            change_type,
            content,
            user: caller.user,
            data_owner: caller.data_owner,
            assignees,
            reviewers,
        })
        .await
}

/// Propose a new catalog item
pub async fn create_item(
    State(state): State<SharedState>,
    caller: Caller,
    Path(path): Path<ItemPath>,
    Json(payload): Json<ItemRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let filename = path.filename.clone();
    submit(&state, caller, path, ChangeType::Add, Some(payload)).await?;

    info!("Addition of {} proposed", filename);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("Addition of '{}' proposed.", filename))),
    ))
}

/// Propose a new version of an existing item
pub async fn update_item(
    State(state): State<SharedState>,
    caller: Caller,
    Path(path): Path<ItemPath>,
    Json(payload): Json<ItemRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let filename = path.filename.clone();
    submit(&state, caller, path, ChangeType::Update, Some(payload)).await?;

    info!("Update of {} proposed", filename);
    Ok(Json(MessageResponse::new(format!(
        "Update of '{}' proposed.",
        filename
    ))))
}

/// Propose the removal of an item
pub async fn delete_item(
    State(state): State<SharedState>,
    caller: Caller,
    Path(path): Path<ItemPath>,
) -> ApiResult<StatusCode> {
    let filename = path.filename.clone();
    submit(&state, caller, path, ChangeType::Delete, None).await?;

    info!("Deletion of {} proposed", filename);
    Ok(StatusCode::NO_CONTENT)
}

/// Proposals visible to the caller: data owners see everyone's
async fn visible_proposals(state: &SharedState, caller: &Caller) -> ApiResult<Vec<ChangeProposal>> {
    let user = (!caller.data_owner).then_some(caller.user.as_str());
    state.proposals.list_proposals(user).await
}

/// List change proposals
pub async fn list_item_requests(
    State(state): State<SharedState>,
    caller: Caller,
) -> ApiResult<Json<SuccessResponse<ProposalListResponse>>> {
    let items = visible_proposals(&state, &caller).await?;

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} proposal(s).", items.len()),
        ProposalListResponse { items },
    )))
}

/// List change proposals for one item type
pub async fn list_item_requests_by_type(
    State(state): State<SharedState>,
    caller: Caller,
    Path(item_type): Path<String>,
) -> ApiResult<Json<SuccessResponse<ProposalListResponse>>> {
    state.ensure_item_type(&item_type)?;

    let items: Vec<_> = visible_proposals(&state, &caller)
        .await?
        .into_iter()
        .filter(|p| p.item_type == item_type)
        .collect();

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} {} proposal(s).", items.len(), item_type),
        ProposalListResponse { items },
    )))
}

/// List items already merged into the catalog
pub async fn list_items(
    State(state): State<SharedState>,
    _caller: Caller,
    Path(item_type): Path<String>,
) -> ApiResult<Json<SuccessResponse<ItemListResponse>>> {
    state.ensure_item_type(&item_type)?;

    let items = state.proposals.list_confirmed_items(&item_type).await?;

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} {} item(s).", items.len(), item_type),
        ItemListResponse { items },
    )))
}
