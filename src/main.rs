//! Catalog Submission API
//!
//! HTTP facade in front of a Git-hosted resource catalog and a set of remote
//! OGC API Processes backends:
//! - Item changes are proposed as pull requests against the catalog repository
//! - Processing requests are relayed to the configured backends, deploying
//!   unknown processes from the resource catalog on first use
//! - Application packages are served from the resource catalog

mod auth;
mod catalog;
mod config;
mod error;
mod github;
mod models;
mod processing;
mod proposal;
mod routes;
mod state;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Catalog Submission API...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");
    info!(
        "📦 Catalog repository {} (main line: {})",
        settings.github.repo_id, settings.github.main_branch
    );
    info!("📦 Accepted item types: {}", settings.catalog.item_types.join(", "));

    if settings.processing.backends.is_empty() {
        warn!("⚠️  No remote processing backends configured");
    } else {
        for (name, url) in &settings.processing.backends {
            info!("⚙️  Processing backend {} -> {}", name, url);
        }
    }
    if settings.catalog.metadata_url.is_none() {
        warn!("⚠️  RESOURCE_CATALOG_METADATA_URL not set, processes will not be auto-deployed");
    }

    let state = Arc::new(AppState::new(&settings)?);

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Item Requests ───");
    info!("   GET    /item-requests                          - List change proposals");
    info!("   GET    /item-requests/{{item_type}}              - List proposals of one type");
    info!("   POST   /item-requests/{{item_type}}/{{filename}}   - Propose a new item");
    info!("   PUT    /item-requests/{{item_type}}/{{filename}}   - Propose an item update");
    info!("   DELETE /item-requests/{{item_type}}/{{filename}}   - Propose an item removal");
    info!("   GET    /items/{{item_type}}                      - List merged items");
    info!("");
    info!("   ─── Processing ───");
    info!("   *      /processing/{{backend}}/processes[/...]   - Proxy to processes");
    info!("   *      /processing/{{backend}}/jobs[/...]        - Proxy to jobs");
    info!("   GET    /applications/{{application}}             - Application package");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalog_submission_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
