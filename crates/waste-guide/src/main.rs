mod cache;
mod catalog;
mod config;
mod error;
mod identify;
mod locations;
mod model;
mod search;
mod server;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::CenterCache;
use catalog::Catalog;
use config::Config;
use identify::Identifier;
use locations::CenterFinder;
use search::Matcher;
use server::WasteGuideServer;
use waste_common::places::{PlacesClient, PlacesClientConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting waste-guide MCP server");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        radius_meters = config.search_radius_meters,
        keyword = %config.center_keyword,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    // 2. Connect to Redis (optional — graceful degradation if unavailable)
    let redis_cache = waste_common::redis::RedisCache::new(config.redis_url.as_deref());
    if redis_cache.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without cache");
    }
    let cache = Arc::new(CenterCache::new(redis_cache));

    // 3. Build the category catalog and matcher
    let catalog = Arc::new(Catalog::new(catalog::builtin())?);
    info!(categories = catalog.len(), "catalog loaded");
    let matcher = Arc::new(Matcher::new(Arc::clone(&catalog)));

    // 4. Places client for the recycling-center finder
    let places_config = PlacesClientConfig::from_env(config.places_api_key.clone());
    info!(
        base_url = %places_config.base_url,
        timeout_ms = places_config.default_timeout.as_millis(),
        max_retries = places_config.max_retries,
        "places client configured"
    );
    let places = Arc::new(PlacesClient::new(places_config)?);
    let finder = Arc::new(CenterFinder::new(
        places,
        cache,
        config.search_radius_meters,
        config.center_keyword.clone(),
    ));

    let identifier = Arc::new(Identifier::new(config.identify_delay));

    // 5. Build MCP server and serve on stdio (or TCP when configured)
    let server = WasteGuideServer::new(matcher, identifier, finder);

    if let Ok(addr) = std::env::var("MCP_TCP_LISTEN_ADDR") {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
