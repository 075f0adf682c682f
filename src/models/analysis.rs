use serde::{Deserialize, Serialize};

use super::MovieDetails;

/// Response body of `/analyze`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    pub query_movie: QueryMovie,
    pub similar_movies: Vec<SimilarMovie>,
}

/// The movie the user asked about, flattened for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryMovie {
    pub id: String,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub genres: String,
    pub rating: f64,
    pub runtime: String,
}

impl From<&MovieDetails> for QueryMovie {
    fn from(movie: &MovieDetails) -> Self {
        Self {
            id: movie.catalog_id(),
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            release_date: movie.release_date.clone(),
            genres: movie.genre_string(),
            rating: movie.vote_average,
            runtime: movie.runtime_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarMovie {
    pub title: String,
    pub genres: String,
    /// Percentage derived from the store's distance, see [`similarity_score`]
    pub similarity: f64,
    pub justification: String,
    pub shared_genres: Vec<String>,
}

/// Maps a vector-store distance onto a 0-100 style score: `round(100 - 25d, 1)`.
///
/// Halves round to the even digit (99.25 becomes 99.2). Not clamped; distances
/// above 4 produce negative scores.
pub fn similarity_score(distance: f64) -> f64 {
    let raw = 100.0 - distance * 25.0;
    (raw * 10.0).round_ties_even() / 10.0
}

/// Genre names present both in the stored genre string and in the query movie.
///
/// Ordered as they appear in `stored_genres`, without duplicates.
pub fn shared_genres(stored_genres: &str, movie: &MovieDetails) -> Vec<String> {
    let mut shared: Vec<String> = Vec::new();
    for name in stored_genres.split(", ") {
        if movie.genre_names().any(|g| g == name) && !shared.iter().any(|s| s == name) {
            shared.push(name.to_string());
        }
    }
    shared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;

    fn movie_with_genres(names: &[&str]) -> MovieDetails {
        MovieDetails {
            id: 155,
            title: "The Dark Knight".to_string(),
            overview: "Batman raises the stakes in his war on crime.".to_string(),
            genres: names
                .iter()
                .enumerate()
                .map(|(i, n)| Genre {
                    id: i as u64,
                    name: n.to_string(),
                })
                .collect(),
            release_date: "2008-07-16".to_string(),
            vote_average: 8.5,
            runtime: Some(152),
        }
    }

    #[test]
    fn test_score_endpoints() {
        assert_eq!(similarity_score(0.0), 100.0);
        assert_eq!(similarity_score(4.0), 0.0);
    }

    #[test]
    fn test_score_rounds_to_one_decimal() {
        assert_eq!(similarity_score(1.0), 75.0);
        assert_eq!(similarity_score(0.8734), 78.2);
        assert_eq!(similarity_score(1.2345), 69.1);
    }

    #[test]
    fn test_score_halves_round_to_even() {
        assert_eq!(similarity_score(0.03), 99.2);
        assert_eq!(similarity_score(0.07), 98.2);
        assert_eq!(similarity_score(0.11), 97.2);
        assert_eq!(similarity_score(0.13), 96.8);
        assert_eq!(similarity_score(0.5), 87.5);
        assert_eq!(similarity_score(2.02), 49.5);
    }

    #[test]
    fn test_score_stays_in_range_over_unit_steps() {
        for step in 0..=400 {
            let score = similarity_score(step as f64 / 100.0);
            assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn test_score_not_clamped() {
        assert_eq!(similarity_score(5.0), -25.0);
    }

    #[test]
    fn test_shared_genres_intersection() {
        let movie = movie_with_genres(&["Drama", "Action", "Crime", "Thriller"]);
        let shared = shared_genres("Action, Science Fiction, Thriller", &movie);
        assert_eq!(shared, vec!["Action".to_string(), "Thriller".to_string()]);
    }

    #[test]
    fn test_shared_genres_ignores_truncated_tail() {
        let movie = movie_with_genres(&["Adventure", "Action", "Science Fiction"]);
        let shared = shared_genres("Adventure, Action, Science ...", &movie);
        assert_eq!(shared, vec!["Adventure".to_string(), "Action".to_string()]);
    }

    #[test]
    fn test_shared_genres_empty() {
        let movie = movie_with_genres(&["Romance"]);
        assert!(shared_genres("Horror", &movie).is_empty());
        assert!(shared_genres("", &movie).is_empty());
    }

    #[test]
    fn test_query_movie_serialization_shape() {
        let movie = movie_with_genres(&["Drama", "Action"]);
        let value = serde_json::to_value(QueryMovie::from(&movie)).unwrap();
        assert_eq!(value["id"], "155");
        assert_eq!(value["genres"], "Drama, Action");
        assert_eq!(value["runtime"], "152min");
        assert_eq!(value["rating"], 8.5);
    }
}
