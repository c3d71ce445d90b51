//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::Path;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Docker
            port: 8000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        // Empty means any origin
        Self {
            allowed_origins: Vec::new(),
        }
    }
}

/// GitHub repository holding the catalog
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_url: Url,
    pub token: String,
    /// `owner/name`
    pub repo_id: String,
    pub main_branch: String,
}

/// Catalog submission settings
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Item types accepted in `/item-requests/{item_type}/...`
    pub item_types: Vec<String>,
    /// Label put on proposals opened by data owners
    pub data_owner_label: String,
    /// Base URL of the resource catalog metadata items
    pub metadata_url: Option<Url>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            item_types: vec!["stac_dist".to_string()],
            data_owner_label: "DataOwner".to_string(),
            metadata_url: None,
        }
    }
}

/// Remote processing backends reachable through the proxy
#[derive(Debug, Clone, Default)]
pub struct ProcessingConfig {
    pub backends: HashMap<String, Url>,
}

impl ProcessingConfig {
    /// Load the `{name: url}` mapping from a JSON file
    pub fn from_mapping_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_mapping_json(&raw)
    }

    pub fn from_mapping_json(raw: &str) -> Result<Self, ConfigError> {
        let mapping: HashMap<String, String> = serde_json::from_str(raw)
            .map_err(|e| ConfigError::ParseError(format!("remote backend mapping: {}", e)))?;

        let backends = mapping
            .into_iter()
            .map(|(name, url)| {
                Url::parse(&url)
                    .map(|url| (name.clone(), url))
                    .map_err(|e| {
                        ConfigError::InvalidValue(format!("backend '{}' has invalid URL: {}", name, e))
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { backends })
    }
}

/// Complete application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub github: GitHubConfig,
    pub catalog: CatalogConfig,
    pub processing: ProcessingConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: std::env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let cors = CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| split_list(&s))
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let github = GitHubConfig {
            api_url: parse_url(
                "GITHUB_API_URL",
                &std::env::var("GITHUB_API_URL")
                    .unwrap_or_else(|_| "https://api.github.com".to_string()),
            )?,
            token: required_var("GITHUB_TOKEN")?,
            repo_id: Self::parse_repo_id(&required_var("GITHUB_REPO_ID")?)?,
            main_branch: std::env::var("GITHUB_MAIN_BRANCH").unwrap_or_else(|_| "main".to_string()),
        };

        let defaults = CatalogConfig::default();
        let catalog = CatalogConfig {
            item_types: std::env::var("CATALOG_ITEM_TYPES")
                .ok()
                .map(|s| split_list(&s))
                .filter(|types| !types.is_empty())
                .unwrap_or(defaults.item_types),
            data_owner_label: std::env::var("DATA_OWNER_LABEL")
                .unwrap_or(defaults.data_owner_label),
            metadata_url: std::env::var("RESOURCE_CATALOG_METADATA_URL")
                .ok()
                .map(|u| parse_url("RESOURCE_CATALOG_METADATA_URL", &u))
                .transpose()?,
        };

        let processing = match std::env::var("REMOTE_PROCESSING_BACKEND_MAPPING_FILE_PATH") {
            Ok(path) => ProcessingConfig::from_mapping_file(path)?,
            Err(_) => ProcessingConfig::default(),
        };

        Ok(Self {
            server,
            cors,
            github,
            catalog,
            processing,
        })
    }

    /// Validate an `owner/name` repository identifier
    fn parse_repo_id(repo_id: &str) -> Result<String, ConfigError> {
        match repo_id.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(repo_id.to_string())
            }
            _ => Err(ConfigError::InvalidValue(format!(
                "GITHUB_REPO_ID must look like 'owner/name', got '{}'",
                repo_id
            ))),
        }
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

fn parse_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidValue(format!("{}: {}", name, e)))
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
