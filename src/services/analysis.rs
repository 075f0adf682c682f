use crate::{
    error::{AppError, AppResult},
    models::{
        shared_genres, similarity_score, AnalyzeResponse, MovieDetails, Neighbor, QueryMovie,
        SimilarMovie, SIMILAR_MOVIE_COUNT,
    },
    services::MovieServices,
};

/// Used when the language model cannot produce an explanation
pub const FALLBACK_EXPLANATION: &str = "Similar in themes and style.";

/// Finds the stored movies closest to `movie_title` and explains each match.
///
/// Steps run strictly in sequence: catalog lookup, overview embedding,
/// nearest-neighbor query, then one explanation per neighbor.
pub async fn analyze_movie(services: &MovieServices, movie_title: &str) -> AppResult<AnalyzeResponse> {
    tracing::info!(movie_title = %movie_title, "Starting analysis");

    let movie = services
        .retry
        .run("catalog.lookup", || services.catalog.lookup(movie_title))
        .await
        .map_err(|e| {
            tracing::error!(movie_title = %movie_title, error = %e, "Error fetching movie data");
            e
        })?;
    tracing::info!(movie_title = %movie.title, movie_id = movie.id, "Fetched movie data");

    let embedding = services
        .retry
        .run("embedder.embed", || services.embedder.embed(&movie.overview))
        .await
        .map_err(|e| {
            tracing::error!(movie_title = %movie.title, error = %e, "Error generating embedding");
            e
        })?;

    let neighbors = services
        .retry
        .run("store.query", || {
            services.store.query(&embedding, SIMILAR_MOVIE_COUNT)
        })
        .await
        .map_err(|e| {
            tracing::error!(movie_title = %movie.title, error = %e, "Error querying similar movies");
            e
        })?;
    tracing::info!(
        movie_title = %movie.title,
        neighbors = neighbors.len(),
        "Queried similar movies"
    );

    let mut similar_movies = Vec::with_capacity(neighbors.len());
    for neighbor in neighbors.iter().take(SIMILAR_MOVIE_COUNT) {
        match similar_movie(services, &movie, neighbor).await {
            Ok(similar) => similar_movies.push(similar),
            Err(e) => {
                tracing::error!(
                    movie_title = %movie.title,
                    neighbor_id = %neighbor.id,
                    error = %e,
                    "Error processing similar movie, skipping"
                );
            }
        }
    }

    tracing::info!(
        movie_title = %movie.title,
        similar = similar_movies.len(),
        "Analysis completed"
    );

    Ok(AnalyzeResponse {
        query_movie: QueryMovie::from(&movie),
        similar_movies,
    })
}

async fn similar_movie(
    services: &MovieServices,
    movie: &MovieDetails,
    neighbor: &Neighbor,
) -> AppResult<SimilarMovie> {
    let title = neighbor
        .metadata
        .title
        .clone()
        .ok_or_else(|| AppError::ExternalApi(format!("Neighbor {} has no title", neighbor.id)))?;
    let genres = neighbor.metadata.genres.clone().unwrap_or_default();

    let justification = explain(services, &movie.title, &title).await;

    Ok(SimilarMovie {
        shared_genres: shared_genres(&genres, movie),
        similarity: similarity_score(neighbor.distance),
        title,
        genres,
        justification,
    })
}

/// Explanation for the pair, or [`FALLBACK_EXPLANATION`] if the model fails.
///
/// The explainer is called once, outside the retry policy.
pub async fn explain(services: &MovieServices, movie: &str, similar: &str) -> String {
    match services.explainer.explain(movie, similar).await {
        Ok(sentence) => sentence,
        Err(e) => {
            tracing::error!(
                movie_title = %movie,
                similar_title = %similar,
                error = %e,
                "Error generating explanation, using fallback"
            );
            FALLBACK_EXPLANATION.to_string()
        }
    }
}
