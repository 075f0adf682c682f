use std::sync::Arc;

use crate::services::MovieServices;

/// Shared application state
///
/// Only immutable, reference-counted clients; requests never contend on it.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<MovieServices>,
}

impl AppState {
    pub fn new(services: MovieServices) -> Self {
        Self {
            services: Arc::new(services),
        }
    }
}
