//! Reverse proxy to remote processing backends
//!
//! Requests under `/processing/{backend}/{processes|jobs}` are replayed
//! against the backend's base URL and the upstream response is relayed as
//! is, error statuses included.

use crate::auth::USER_HEADER;
use crate::catalog::CatalogClient;
use crate::error::AppError;
use axum::body::Body;
use axum::http::header::{
    HeaderName, HeaderValue, ACCEPT_ENCODING, CONNECTION, CONTENT_ENCODING, CONTENT_LENGTH, HOST,
    TRANSFER_ENCODING,
};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use url::Url;

/// Stripped from upstream responses; the relayed body is already decoded
/// and framed by this server.
const EXCLUDED_RESPONSE_HEADERS: [HeaderName; 4] =
    [CONTENT_ENCODING, CONTENT_LENGTH, TRANSFER_ENCODING, CONNECTION];

/// Not copied to upstream requests; the client frames and negotiates itself.
const RECOMPUTED_REQUEST_HEADERS: [HeaderName; 4] =
    [CONTENT_LENGTH, TRANSFER_ENCODING, CONNECTION, ACCEPT_ENCODING];

/// Proxied OGC API Processes resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Processes,
    Jobs,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Processes => "processes",
            Service::Jobs => "jobs",
        }
    }
}

/// The incoming request, as far as it is forwarded
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct ProcessingProxy {
    http: Client,
    backends: HashMap<String, Url>,
    catalog: Option<CatalogClient>,
}

impl ProcessingProxy {
    pub fn new(http: Client, backends: HashMap<String, Url>, catalog: Option<CatalogClient>) -> Self {
        Self {
            http,
            backends,
            catalog,
        }
    }

    pub fn resolve(&self, backend: &str) -> Result<&Url, AppError> {
        self.backends
            .get(backend)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid remote backend {}", backend)))
    }

    /// Forward `request` to `{backend}/{service}[/{path}]`
    pub async fn forward(
        &self,
        backend: &str,
        service: Service,
        path: Option<&str>,
        request: &ProxyRequest,
    ) -> Result<Response, AppError> {
        let url = target_url(self.resolve(backend)?, service, path, request.query.as_deref())?;
        let host = url
            .host_str()
            .ok_or_else(|| AppError::Config(format!("Backend {} has no host", backend)))?;

        let mut headers = request.headers.clone();
        for name in RECOMPUTED_REQUEST_HEADERS.iter() {
            headers.remove(name);
        }
        let host = HeaderValue::from_str(host)
            .map_err(|_| AppError::Config(format!("Backend {} has an invalid host", backend)))?;
        headers.insert(HOST, host);

        info!("Proxying {} to {}", request.method, url);
        debug!("Forwarded headers: {:?}", headers);

        let upstream = self
            .http
            .request(request.method.clone(), url)
            .headers(headers)
            .body(request.body.clone())
            .send()
            .await?;

        info!(
            "Got status {} from backend {} (size {:?})",
            upstream.status(),
            backend,
            upstream.content_length()
        );
        relay(upstream).await
    }

    /// Look up a process, deploying it from the catalog when the backend
    /// does not know it yet.
    pub async fn get_process(
        &self,
        backend: &str,
        process_id: &str,
        request: &ProxyRequest,
    ) -> Result<Response, AppError> {
        let response = self
            .forward(backend, Service::Processes, Some(process_id), request)
            .await?;
        if response.status() != StatusCode::NOT_FOUND {
            return Ok(response);
        }

        let Some(catalog) = &self.catalog else {
            debug!("No catalog configured, cannot deploy {}", process_id);
            return Ok(response);
        };

        info!("Process {} not found on {}, deploying from catalog", process_id, backend);
        self.deploy(catalog, backend, process_id, request.headers.get(USER_HEADER))
            .await?;

        self.forward(backend, Service::Processes, Some(process_id), request)
            .await
    }

    /// `POST {backend}/processes` with the application package of catalog
    /// entry `process_id`
    async fn deploy(
        &self,
        catalog: &CatalogClient,
        backend: &str,
        process_id: &str,
        user: Option<&HeaderValue>,
    ) -> Result<(), AppError> {
        let package = catalog.application_package_url(process_id).await?;
        let url = target_url(self.resolve(backend)?, Service::Processes, None, None)?;

        let mut request = self.http.post(url).json(&serde_json::json!({
            "executionUnit": {
                "href": package.as_str(),
                "type": "application/cwl"
            }
        }));
        if let Some(user) = user {
            request = request.header(USER_HEADER, user.clone());
        }

        let response = request.send().await?;
        if response.status().is_success() {
            info!("Deployed {} to {}", process_id, backend);
        } else {
            warn!(
                "Deploying {} to {} returned {}",
                process_id,
                backend,
                response.status()
            );
        }
        Ok(())
    }
}

/// `{base}/{service}[/{path}]`; `path` is split into segments appended
/// under the service, so it can never climb above it.
fn target_url(
    base: &Url,
    service: Service,
    path: Option<&str>,
    query: Option<&str>,
) -> Result<Url, AppError> {
    let segments: Vec<&str> = path
        .unwrap_or_default()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    if segments.iter().any(|s| matches!(*s, "." | "..")) {
        return Err(AppError::BadRequest(format!(
            "Invalid proxy path '{}'",
            path.unwrap_or_default()
        )));
    }

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::Config(format!("Backend URL {} cannot be a base", base)))?
        .pop_if_empty()
        .push(service.as_str())
        .extend(segments);
    url.set_query(query.filter(|q| !q.is_empty()));
    Ok(url)
}

/// Convert the upstream response, keeping status and body bytes
async fn relay(upstream: reqwest::Response) -> Result<Response, AppError> {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    for name in EXCLUDED_RESPONSE_HEADERS.iter() {
        headers.remove(name);
    }
    let body = upstream.bytes().await?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
