use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::{
    error::AppResult,
    models::{StoredMovie, VectorEntry},
    services::MovieServices,
};

/// Titles loaded into an empty deployment
pub const DEFAULT_TITLES: [&str; 20] = [
    "Inception",
    "The Dark Knight",
    "Interstellar",
    "The Matrix",
    "Pulp Fiction",
    "Fight Club",
    "Forrest Gump",
    "Gladiator",
    "The Godfather",
    "Titanic",
    "Jurassic Park",
    "Avatar",
    "Star Wars: A New Hope",
    "The Avengers",
    "Casablanca",
    "The Shawshank Redemption",
    "The Lion King",
    "Back to the Future",
    "E.T. the Extra-Terrestrial",
    "The Social Network",
];

/// What happened to a single title during seeding
#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
    Inserted { id: String },
    AlreadyPresent { id: String },
    Failed { error: String },
}

/// Summary of a seeding run
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<(String, SeedOutcome)>,
}

impl SeedReport {
    pub fn inserted(&self) -> usize {
        self.count(|o| matches!(o, SeedOutcome::Inserted { .. }))
    }

    pub fn already_present(&self) -> usize {
        self.count(|o| matches!(o, SeedOutcome::AlreadyPresent { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SeedOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&SeedOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| predicate(o)).count()
    }
}

/// Parses a titles file: one title per line, blank lines and `#` comments ignored
pub fn parse_titles(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Looks up, embeds and stores every title, skipping IDs already in the store.
///
/// A failing title is logged and recorded; the run continues with the next one.
/// `pause` is slept between titles to stay clear of upstream rate limits.
pub async fn seed_movies(services: &MovieServices, titles: &[String], pause: Duration) -> SeedReport {
    let started_at = Utc::now();
    let total = titles.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, title) in titles.iter().enumerate() {
        tracing::info!(movie_title = %title, progress = %format!("{}/{}", index + 1, total), "Processing movie");

        let outcome = match seed_one(services, title).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(movie_title = %title, error = %e, "Error processing movie, skipping");
                SeedOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        match &outcome {
            SeedOutcome::Inserted { id } => {
                tracing::info!(movie_title = %title, id = %id, "Movie stored")
            }
            SeedOutcome::AlreadyPresent { id } => {
                tracing::info!(movie_title = %title, id = %id, "Movie already exists, skipping")
            }
            SeedOutcome::Failed { .. } => {}
        }
        outcomes.push((title.clone(), outcome));

        if index + 1 < total && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    let report = SeedReport {
        started_at,
        finished_at: Utc::now(),
        outcomes,
    };

    tracing::info!(
        inserted = report.inserted(),
        already_present = report.already_present(),
        failed = report.failed(),
        elapsed_secs = (report.finished_at - report.started_at).num_seconds(),
        "Seeding finished"
    );

    report
}

async fn seed_one(services: &MovieServices, title: &str) -> AppResult<SeedOutcome> {
    let movie = services
        .retry
        .run("catalog.lookup", || services.catalog.lookup(title))
        .await?;

    let embedding = services
        .retry
        .run("embedder.embed", || services.embedder.embed(&movie.overview))
        .await?;

    let entry = VectorEntry::from_movie(&movie, embedding);
    let inserted = services
        .retry
        .run("store.insert", || services.store.insert_if_absent(&entry))
        .await?;

    Ok(if inserted {
        SeedOutcome::Inserted { id: entry.id }
    } else {
        SeedOutcome::AlreadyPresent { id: entry.id }
    })
}

/// Lists the store's contents after seeding
pub async fn verify_store(services: &MovieServices) -> AppResult<Vec<StoredMovie>> {
    let stored = services
        .retry
        .run("store.list", || services.store.list())
        .await?;

    let total = services
        .retry
        .run("store.count", || services.store.count())
        .await?;
    if total != stored.len() {
        tracing::warn!(total = total, listed = stored.len(), "Listing does not cover every stored entry");
    }

    tracing::info!(total = total, "Total movies in database");
    for (index, movie) in stored.iter().enumerate() {
        tracing::info!(
            position = index + 1,
            id = %movie.id,
            title = %movie.title.as_deref().unwrap_or("<untitled>"),
            "Stored movie"
        );
    }

    Ok(stored)
}
