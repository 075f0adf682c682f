use serde::{Deserialize, Serialize};

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from `GET /search/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbSearchHit>,
}

/// A single search hit; only the ID is needed to fetch full details
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbSearchHit {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Full movie record from `GET /movie/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    /// Minutes; TMDB sends `null` or `0` when unknown
    #[serde(default)]
    pub runtime: Option<u32>,
}

impl MovieDetails {
    /// Catalog ID as stored in the vector store
    pub fn catalog_id(&self) -> String {
        self.id.to_string()
    }

    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(|g| g.name.as_str())
    }

    /// Genre names joined with `", "`
    pub fn genre_string(&self) -> String {
        self.genre_names().collect::<Vec<_>>().join(", ")
    }

    /// `"<n>min"`, or `"N/A"` when the runtime is missing or zero
    pub fn runtime_label(&self) -> String {
        match self.runtime {
            Some(minutes) if minutes > 0 => format!("{}min", minutes),
            _ => "N/A".to_string(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
