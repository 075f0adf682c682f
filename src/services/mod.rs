use std::sync::Arc;

pub mod analysis;
pub mod providers;
pub mod retry;
pub mod seeder;

use providers::{EmbeddingProvider, ExplanationProvider, MovieCatalog, VectorStore};
use retry::RetryPolicy;

/// The external clients a request (or the seeder) works with.
///
/// Built once at process start and shared; holds no mutable state.
#[derive(Clone)]
pub struct MovieServices {
    pub catalog: Arc<dyn MovieCatalog>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub store: Arc<dyn VectorStore>,
    pub explainer: Arc<dyn ExplanationProvider>,
    pub retry: RetryPolicy,
}

impl MovieServices {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        explainer: Arc<dyn ExplanationProvider>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            catalog,
            embedder,
            store,
            explainer,
            retry,
        }
    }
}
