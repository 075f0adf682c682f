/// External service abstractions
///
/// Each upstream (movie catalog, embedding model, vector store, language model)
/// sits behind a trait so handlers and the seeder depend on behavior rather than
/// on a particular vendor. The concrete clients live in the submodules.
use crate::{
    error::{AppError, AppResult},
    models::{MovieDetails, Neighbor, StoredMovie, TmdbSearchHit, VectorEntry},
};

pub mod chroma;
pub mod openai;
pub mod tmdb;

/// Movie metadata catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search movies by free-text title, best match first
    async fn search(&self, title: &str) -> AppResult<Vec<TmdbSearchHit>>;

    /// Fetch the full record for a catalog ID
    async fn details(&self, id: u64) -> AppResult<MovieDetails>;

    /// Resolve a title to the full record of its first search hit
    async fn lookup(&self, title: &str) -> AppResult<MovieDetails> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Movie title cannot be empty".to_string(),
            ));
        }

        let hits = self.search(title).await?;
        let first = hits
            .first()
            .ok_or_else(|| AppError::NotFound(format!("Movie '{}' not found", title)))?;

        self.details(first.id).await
    }

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Text embedding model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;

    fn name(&self) -> &'static str;
}

/// Hosted nearest-neighbor store keyed by catalog ID
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    async fn contains(&self, id: &str) -> AppResult<bool>;

    async fn add(&self, entry: &VectorEntry) -> AppResult<()>;

    /// The `k` nearest stored entries, closest first. May return fewer than `k`.
    async fn query(&self, embedding: &[f32], k: usize) -> AppResult<Vec<Neighbor>>;

    async fn count(&self) -> AppResult<usize>;

    async fn list(&self) -> AppResult<Vec<StoredMovie>>;

    /// Adds `entry` unless its ID is already stored. Returns whether it was added.
    async fn insert_if_absent(&self, entry: &VectorEntry) -> AppResult<bool> {
        if self.contains(&entry.id).await? {
            return Ok(false);
        }
        self.add(entry).await?;
        Ok(true)
    }

    fn name(&self) -> &'static str;
}

/// Language model producing one-sentence similarity justifications
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ExplanationProvider: Send + Sync {
    async fn explain(&self, movie: &str, similar: &str) -> AppResult<String>;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCatalog {
        hits: Vec<TmdbSearchHit>,
    }

    #[async_trait::async_trait]
    impl MovieCatalog for FixedCatalog {
        async fn search(&self, _title: &str) -> AppResult<Vec<TmdbSearchHit>> {
            Ok(self.hits.clone())
        }

        async fn details(&self, id: u64) -> AppResult<MovieDetails> {
            Ok(MovieDetails {
                id,
                title: format!("Movie {}", id),
                overview: String::new(),
                genres: vec![],
                release_date: String::new(),
                vote_average: 0.0,
                runtime: None,
            })
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_lookup_takes_first_hit() {
        let catalog = FixedCatalog {
            hits: vec![
                TmdbSearchHit { id: 7, title: None },
                TmdbSearchHit { id: 9, title: None },
            ],
        };
        let movie = catalog.lookup("anything").await.unwrap();
        assert_eq!(movie.id, 7);
    }

    #[tokio::test]
    async fn test_lookup_without_hits_is_not_found() {
        let catalog = FixedCatalog { hits: vec![] };
        let err = catalog.lookup("Zzzyzx").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Movie 'Zzzyzx' not found"));
    }

    #[tokio::test]
    async fn test_lookup_rejects_blank_title() {
        let catalog = FixedCatalog { hits: vec![] };
        let err = catalog.lookup("   ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
