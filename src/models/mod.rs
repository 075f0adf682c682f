mod analysis;
mod movie;
mod vector;

pub use analysis::{shared_genres, similarity_score, AnalyzeResponse, QueryMovie, SimilarMovie};
pub use movie::{Genre, MovieDetails, TmdbSearchHit, TmdbSearchResponse};
pub use vector::{
    truncate_chars, truncate_genres, EntryMetadata, Neighbor, StoredMovie, VectorEntry,
    MAX_GENRES_CHARS, MAX_OVERVIEW_CHARS, MAX_TITLE_CHARS,
};

/// Number of neighbors returned per analysis
pub const SIMILAR_MOVIE_COUNT: usize = 3;
