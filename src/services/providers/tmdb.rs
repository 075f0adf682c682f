/// TMDB movie catalog
///
/// API Flow:
/// 1. Search: /search/movie?query=... → ranked hits with TMDB IDs
/// 2. Details: /movie/{id} → overview, genres, runtime, rating
use crate::{
    error::{AppError, AppResult},
    models::{MovieDetails, TmdbSearchHit, TmdbSearchResponse},
    services::providers::MovieCatalog,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const SERVICE: &str = "TMDB";

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbCatalog {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn search(&self, title: &str) -> AppResult<Vec<TmdbSearchHit>> {
        let url = format!("{}/search/movie", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::from_response(SERVICE, response).await);
        }

        let search: TmdbSearchResponse = response.json().await.map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse TMDB search response: {}", e))
        })?;

        tracing::info!(
            movie_title = %title,
            results = search.results.len(),
            provider = SERVICE,
            "Movie search completed"
        );

        Ok(search.results)
    }

    async fn details(&self, id: u64) -> AppResult<MovieDetails> {
        let url = format!("{}/movie/{}", self.api_url, id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::from_response(SERVICE, response).await);
        }

        let response_text = response.text().await?;
        let details: MovieDetails = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                movie_id = id,
                "Failed to deserialize TMDB movie details"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB movie details: {}", e))
        })?;

        tracing::debug!(movie_id = id, title = %details.title, "Movie details fetched");

        Ok(details)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_catalog(server: &MockServer) -> TmdbCatalog {
        TmdbCatalog::new(
            "test_key".to_string(),
            server.uri(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_searches_then_fetches_details() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "Inception"))
            .and(query_param("api_key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [{"id": 27205, "title": "Inception"}, {"id": 64956, "title": "Inception: The Cobol Job"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/movie/27205"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 27205,
                "title": "Inception",
                "overview": "Cobb, a skilled thief...",
                "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
                "release_date": "2010-07-15",
                "vote_average": 8.369,
                "runtime": 148
            })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = create_test_catalog(&server);
        let movie = catalog.lookup("Inception").await.unwrap();

        assert_eq!(movie.id, 27205);
        assert_eq!(movie.genre_string(), "Action, Science Fiction");
        assert_eq!(movie.runtime, Some(148));
    }

    #[tokio::test]
    async fn test_lookup_empty_results_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [],
                "total_results": 0
            })))
            .mount(&server)
            .await;

        let catalog = create_test_catalog(&server);
        let err = catalog.lookup("Qwxyzzy").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rate_limited_search_is_retryable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let catalog = create_test_catalog(&server);
        let err = catalog.search("Inception").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 429, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unauthorized_is_permanent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let catalog = create_test_catalog(&server);
        let err = catalog.search("Inception").await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("Invalid API key"));
    }
}
