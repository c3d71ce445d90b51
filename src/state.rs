//! Application state management
//!
//! Contains shared state accessible across all handlers. Nothing in it is
//! mutated after startup.

use crate::catalog::CatalogClient;
use crate::config::Settings;
use crate::error::AppError;
use crate::github::GitHubClient;
use crate::processing::ProcessingProxy;
use crate::proposal::ProposalManager;
use reqwest::redirect::Policy;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Pull-request backed catalog submissions
    pub proposals: ProposalManager,

    /// Reverse proxy to remote processing backends
    pub proxy: ProcessingProxy,

    /// Resource catalog, when `RESOURCE_CATALOG_METADATA_URL` is set
    pub catalog: Option<CatalogClient>,

    /// Accepted `item_type` path values
    pub item_types: Vec<String>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let github = GitHubClient::new(&settings.github)?;
        let proposals = ProposalManager::new(
            github,
            settings.github.main_branch.clone(),
            settings.catalog.data_owner_label.clone(),
        );

        let catalog = settings
            .catalog
            .metadata_url
            .clone()
            .map(|url| -> Result<_, AppError> {
                Ok(CatalogClient::new(reqwest::Client::builder().build()?, url))
            })
            .transpose()?;

        // Redirects are relayed to the client, not followed
        let proxy_http = reqwest::Client::builder().redirect(Policy::none()).build()?;
        let proxy = ProcessingProxy::new(
            proxy_http,
            settings.processing.backends.clone(),
            catalog.clone(),
        );

        Ok(Self {
            proposals,
            proxy,
            catalog,
            item_types: settings.catalog.item_types.clone(),
        })
    }

    pub fn ensure_item_type(&self, item_type: &str) -> Result<(), AppError> {
        if self.item_types.iter().any(|t| t == item_type) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Unknown item type '{}', expected one of: {}",
                item_type,
                self.item_types.join(", ")
            )))
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
