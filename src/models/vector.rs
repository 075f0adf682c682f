use serde::{Deserialize, Serialize};

use super::MovieDetails;

/// Chroma rejects oversized metadata, so stored strings are capped
pub const MAX_TITLE_CHARS: usize = 50;
pub const MAX_OVERVIEW_CHARS: usize = 500;
pub const MAX_GENRES_CHARS: usize = 30;

/// A movie as it is written to the vector store
#[derive(Debug, Clone, PartialEq)]
pub struct VectorEntry {
    pub id: String,
    pub embedding: Vec<f32>,
    pub document: String,
    pub metadata: EntryMetadata,
}

/// Metadata stored alongside each embedding
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
}

impl VectorEntry {
    /// Builds the stored form of `movie`, truncating fields to the store's limits
    pub fn from_movie(movie: &MovieDetails, embedding: Vec<f32>) -> Self {
        Self {
            id: movie.catalog_id(),
            embedding,
            document: truncate_chars(&movie.overview, MAX_OVERVIEW_CHARS),
            metadata: EntryMetadata {
                title: Some(truncate_chars(&movie.title, MAX_TITLE_CHARS)),
                genres: Some(truncate_genres(&movie.genre_string())),
            },
        }
    }
}

/// A stored entry returned by a nearest-neighbor query
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: String,
    pub metadata: EntryMetadata,
    pub distance: f64,
}

/// Stored entry as listed by the seeder's verification pass
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMovie {
    pub id: String,
    pub title: Option<String>,
}

/// First `max` characters of `s`
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Genre strings over the limit keep 27 characters and gain an ellipsis
pub fn truncate_genres(genres: &str) -> String {
    if genres.chars().count() > MAX_GENRES_CHARS {
        let mut truncated = truncate_chars(genres, MAX_GENRES_CHARS - 3);
        truncated.push_str("...");
        truncated
    } else {
        genres.to_string()
    }
}
