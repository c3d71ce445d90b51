//! Processing proxy route handlers
//!
//! `/processing/{remote_backend}/{processes|jobs}[/...]` is relayed to the
//! configured backend. Looking up a single process may deploy it first.

use crate::error::{ApiResult, AppError};
use crate::processing::{ProxyRequest, Service};
use crate::state::SharedState;
use axum::{
    body::to_bytes,
    extract::{Path, Request, State},
    http::Method,
    response::Response,
};

/// Largest request body relayed to a backend
const MAX_PROXY_BODY: usize = 16 * 1024 * 1024;

async fn proxy_request(request: Request) -> ApiResult<ProxyRequest> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_PROXY_BODY)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {}", e)))?;

    Ok(ProxyRequest {
        method: parts.method,
        headers: parts.headers,
        query: parts.uri.query().map(str::to_string),
        body,
    })
}

pub async fn processes(
    State(state): State<SharedState>,
    Path(backend): Path<String>,
    request: Request,
) -> ApiResult<Response> {
    let request = proxy_request(request).await?;
    state.proxy.forward(&backend, Service::Processes, None, &request).await
}

pub async fn processes_path(
    State(state): State<SharedState>,
    Path((backend, path)): Path<(String, String)>,
    request: Request,
) -> ApiResult<Response> {
    let request = proxy_request(request).await?;

    // `processes/{id}` describes a single process, which may need deploying
    if request.method == Method::GET && !path.is_empty() && !path.contains('/') {
        return state.proxy.get_process(&backend, &path, &request).await;
    }
    state
        .proxy
        .forward(&backend, Service::Processes, Some(&path), &request)
        .await
}

pub async fn jobs(
    State(state): State<SharedState>,
    Path(backend): Path<String>,
    request: Request,
) -> ApiResult<Response> {
    let request = proxy_request(request).await?;
    state.proxy.forward(&backend, Service::Jobs, None, &request).await
}

pub async fn jobs_path(
    State(state): State<SharedState>,
    Path((backend, path)): Path<(String, String)>,
    request: Request,
) -> ApiResult<Response> {
    let request = proxy_request(request).await?;
    state
        .proxy
        .forward(&backend, Service::Jobs, Some(&path), &request)
        .await
}
