pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use config::Config;
use services::{
    providers::{
        chroma::{ChromaSettings, ChromaStore, CollectionMode},
        openai::OpenAiClient,
        tmdb::TmdbCatalog,
    },
    retry::RetryPolicy,
    MovieServices,
};

/// Initializes the tracing subscriber; `RUST_LOG` overrides the default `info` level
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Builds every external client from configuration.
///
/// The Chroma connection is retried with `retry`, the same policy later used
/// for individual calls.
pub async fn build_services(
    config: &Config,
    mode: CollectionMode,
    retry: RetryPolicy,
) -> anyhow::Result<MovieServices> {
    tracing::info!("Initializing clients...");

    let catalog = TmdbCatalog::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.http_timeout(),
    )?;

    let openai = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.embedding_model.clone(),
        config.chat_model.clone(),
        config.http_timeout(),
    )?);

    let settings = ChromaSettings {
        url: config.chroma_url.clone(),
        token: config.chroma_api_key.clone(),
        tenant: config.chroma_tenant.clone(),
        database: config.chroma_database.clone(),
        collection: config.chroma_collection.clone(),
        timeout: config.http_timeout(),
    };
    let store = retry
        .run("store.connect", || ChromaStore::connect(&settings, mode))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize Chroma client: {}", e))?;

    tracing::info!("Clients initialized successfully");

    Ok(MovieServices::new(
        Arc::new(catalog),
        openai.clone(),
        Arc::new(store),
        openai,
        retry,
    ))
}
