use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use cinematch_api::{
    build_services,
    config::Config,
    init_tracing,
    services::{
        providers::chroma::CollectionMode,
        seeder::{parse_titles, seed_movies, verify_store, DEFAULT_TITLES},
    },
};

/// Load movie embeddings into the vector store
#[derive(Debug, Parser)]
#[command(name = "seed", version)]
struct Args {
    /// File with one movie title per line (defaults to the built-in list)
    #[arg(long)]
    titles_file: Option<PathBuf>,

    /// Pause between titles in milliseconds (overrides SEED_PAUSE_MS)
    #[arg(long)]
    pause_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Error loading environment");
            std::process::exit(1);
        }
    };

    let titles = match &args.titles_file {
        Some(path) => parse_titles(&std::fs::read_to_string(path)?),
        None => DEFAULT_TITLES.iter().map(|t| t.to_string()).collect(),
    };

    let services = match build_services(
        &config,
        CollectionMode::GetOrCreate,
        config.seed_retry_policy(),
    )
    .await
    {
        Ok(services) => services,
        Err(e) => {
            tracing::error!(error = %e, "Error connecting to Chroma");
            std::process::exit(1);
        }
    };

    let pause = Duration::from_millis(args.pause_ms.unwrap_or(config.seed_pause_ms));
    let report = seed_movies(&services, &titles, pause).await;

    for (title, outcome) in &report.outcomes {
        tracing::debug!(movie_title = %title, outcome = ?outcome, "Seed outcome");
    }

    if let Err(e) = verify_store(&services).await {
        tracing::error!(error = %e, "Error verifying database");
    }

    tracing::info!(
        inserted = report.inserted(),
        already_present = report.already_present(),
        failed = report.failed(),
        "Script completed"
    );

    Ok(())
}
