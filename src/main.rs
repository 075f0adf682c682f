use cinematch_api::{
    api::{create_router, AppState},
    build_services,
    config::Config,
    init_tracing,
    services::providers::chroma::CollectionMode,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Missing required environment variables");
            std::process::exit(1);
        }
    };

    let services = build_services(
        &config,
        CollectionMode::Existing,
        config.request_retry_policy(),
    )
    .await?;

    let app = create_router(AppState::new(services));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
