#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cinematch_api::{
    error::{AppError, AppResult},
    models::{Genre, MovieDetails, Neighbor, StoredMovie, TmdbSearchHit, VectorEntry},
    services::{
        providers::{EmbeddingProvider, ExplanationProvider, MovieCatalog, VectorStore},
        retry::RetryPolicy,
        MovieServices,
    },
};

pub fn movie(id: u64, title: &str, overview: &str, genres: &[&str], runtime: Option<u32>) -> MovieDetails {
    MovieDetails {
        id,
        title: title.to_string(),
        overview: overview.to_string(),
        genres: genres
            .iter()
            .enumerate()
            .map(|(i, name)| Genre {
                id: i as u64,
                name: name.to_string(),
            })
            .collect(),
        release_date: "2010-07-15".to_string(),
        vote_average: 8.4,
        runtime,
    }
}

/// Catalog keyed by exact title
#[derive(Default)]
pub struct FakeCatalog {
    movies: HashMap<String, MovieDetails>,
}

impl FakeCatalog {
    pub fn with(mut self, movie: MovieDetails) -> Self {
        self.movies.insert(movie.title.clone(), movie);
        self
    }
}

#[async_trait::async_trait]
impl MovieCatalog for FakeCatalog {
    async fn search(&self, title: &str) -> AppResult<Vec<TmdbSearchHit>> {
        Ok(self
            .movies
            .get(title)
            .map(|m| TmdbSearchHit {
                id: m.id,
                title: Some(m.title.clone()),
            })
            .into_iter()
            .collect())
    }

    async fn details(&self, id: u64) -> AppResult<MovieDetails> {
        self.movies
            .values()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))
    }

    fn name(&self) -> &'static str {
        "fake-catalog"
    }
}

/// Embeds text as (length, vowel count, word count)
pub struct FakeEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let vowels = text.chars().filter(|c| "aeiouAEIOU".contains(*c)).count();
        Ok(vec![
            text.len() as f32 / 100.0,
            vowels as f32 / 100.0,
            text.split_whitespace().count() as f32 / 10.0,
        ])
    }

    fn name(&self) -> &'static str {
        "fake-embedder"
    }
}

/// Vector store held in memory, ranked by squared euclidean distance
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<Vec<VectorEntry>>,
}

impl InMemoryStore {
    pub fn with(self, entry: VectorEntry) -> Self {
        self.entries.lock().unwrap().push(entry);
        self
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.id.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl VectorStore for InMemoryStore {
    async fn contains(&self, id: &str) -> AppResult<bool> {
        Ok(self.entries.lock().unwrap().iter().any(|e| e.id == id))
    }

    async fn add(&self, entry: &VectorEntry) -> AppResult<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn query(&self, embedding: &[f32], k: usize) -> AppResult<Vec<Neighbor>> {
        let entries = self.entries.lock().unwrap();
        let mut neighbors: Vec<Neighbor> = entries
            .iter()
            .map(|e| Neighbor {
                id: e.id.clone(),
                metadata: e.metadata.clone(),
                distance: e
                    .embedding
                    .iter()
                    .zip(embedding)
                    .map(|(a, b)| ((a - b) * (a - b)) as f64)
                    .sum(),
            })
            .collect();
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        Ok(neighbors)
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.entries.lock().unwrap().len())
    }

    async fn list(&self) -> AppResult<Vec<StoredMovie>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| StoredMovie {
                id: e.id.clone(),
                title: e.metadata.title.clone(),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

/// Explainer that either answers with a canned sentence or always fails
pub struct FakeExplainer {
    pub fail: bool,
}

#[async_trait::async_trait]
impl ExplanationProvider for FakeExplainer {
    async fn explain(&self, movie: &str, similar: &str) -> AppResult<String> {
        if self.fail {
            return Err(AppError::Upstream {
                service: "OpenAI",
                status: 500,
                message: "model unavailable".to_string(),
            });
        }
        Ok(format!("{} and {} share a sense of wonder.", movie, similar))
    }

    fn name(&self) -> &'static str {
        "fake-explainer"
    }
}

pub fn services(catalog: FakeCatalog, store: Arc<InMemoryStore>, explainer_fails: bool) -> MovieServices {
    MovieServices::new(
        Arc::new(catalog),
        Arc::new(FakeEmbedder),
        store,
        Arc::new(FakeExplainer {
            fail: explainer_fails,
        }),
        RetryPolicy::immediate(2),
    )
}
