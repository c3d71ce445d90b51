//! Resource catalog client
//!
//! Catalog entries are feature-like records whose `associations` point at
//! the application packages that processing backends can deploy.

use crate::error::AppError;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

/// Relation marking the deployable application package
pub const APPLICATION_PACKAGE_REL: &str = "application-package";

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub properties: EntryProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryProperties {
    #[serde(default)]
    pub associations: Vec<Association>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Association {
    pub href: String,
    #[serde(default)]
    pub rel: Option<String>,
}

impl CatalogEntry {
    /// The application package link, falling back to the first association
    pub fn application_package_link(&self) -> Option<&str> {
        let associations = &self.properties.associations;
        associations
            .iter()
            .find(|a| a.rel.as_deref() == Some(APPLICATION_PACKAGE_REL))
            .or_else(|| associations.first())
            .map(|a| a.href.as_str())
    }
}

#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn entry_url(&self, id: &str) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("cannot use '{}' as catalog URL", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Fetch the catalog entry `id`, e.g. `my-process-1.0.0`
    pub async fn fetch_entry(&self, id: &str) -> Result<(Url, CatalogEntry), AppError> {
        let url = self.entry_url(id)?;
        debug!("Fetching catalog entry {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Catalog entry {} not found", id)));
        }

        let entry = response.error_for_status()?.json::<CatalogEntry>().await?;
        Ok((url, entry))
    }

    /// Resolved application package link of entry `id`
    pub async fn application_package_url(&self, id: &str) -> Result<Url, AppError> {
        let (entry_url, entry) = self.fetch_entry(id).await?;
        let href = entry.application_package_link().ok_or_else(|| {
            AppError::NotFound(format!("Catalog entry {} has no application package link", id))
        })?;

        entry_url
            .join(href)
            .map_err(|e| AppError::BadRequest(format!("Invalid application package link '{}': {}", href, e)))
    }

    /// Fetch and parse the application package of entry `id`.
    ///
    /// Packages are CWL documents in YAML or JSON; both parse as YAML.
    pub async fn fetch_application(&self, id: &str) -> Result<serde_json::Value, AppError> {
        let link = self.application_package_url(id).await?;
        info!("Fetching application package {}", link);

        let raw = self
            .http
            .get(link.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        serde_yaml::from_slice(&raw).map_err(|e| {
            AppError::Internal(format!("Application package {} could not be parsed: {}", link, e))
        })
    }
}
