/// Chroma Cloud vector store (REST API v2)
///
/// All collection routes live under
/// `/api/v2/tenants/{tenant}/databases/{database}/collections`, authenticated
/// with the `x-chroma-token` header. Distances and indexing are Chroma's.
use crate::{
    error::{AppError, AppResult},
    models::{EntryMetadata, Neighbor, StoredMovie, VectorEntry},
    services::providers::VectorStore,
};
use reqwest::{Client as HttpClient, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const SERVICE: &str = "Chroma";
const TOKEN_HEADER: &str = "x-chroma-token";
const COLLECTION_DESCRIPTION: &str = "Movie embeddings collection";

/// Connection parameters for a Chroma tenant/database
#[derive(Debug, Clone)]
pub struct ChromaSettings {
    pub url: String,
    pub token: String,
    pub tenant: String,
    pub database: String,
    pub collection: String,
    pub timeout: Duration,
}

/// How to resolve the collection at connect time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionMode {
    /// Fail if the collection does not exist (serving)
    Existing,
    /// Create it on first use (seeding)
    GetOrCreate,
}

#[derive(Debug, Deserialize)]
struct Collection {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct AddRequest<'a> {
    ids: [&'a str; 1],
    embeddings: [&'a [f32]; 1],
    documents: [&'a str; 1],
    metadatas: [&'a EntryMetadata; 1],
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    ids: Vec<String>,
    #[serde(default)]
    metadatas: Option<Vec<Option<EntryMetadata>>>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f64>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<EntryMetadata>>>>,
}

#[derive(Clone)]
pub struct ChromaStore {
    http_client: HttpClient,
    collection_url: String,
    token: String,
}

impl ChromaStore {
    /// Checks the server heartbeat and resolves the collection
    pub async fn connect(settings: &ChromaSettings, mode: CollectionMode) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(settings.timeout).build()?;
        let base_url = settings.url.trim_end_matches('/');

        let heartbeat = http_client
            .get(format!("{}/api/v2/heartbeat", base_url))
            .header(TOKEN_HEADER, &settings.token)
            .send()
            .await?;
        if !heartbeat.status().is_success() {
            return Err(AppError::from_response(SERVICE, heartbeat).await);
        }

        let collections_url = format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            base_url, settings.tenant, settings.database
        );

        let request = match mode {
            CollectionMode::Existing => http_client
                .get(format!("{}/{}", collections_url, settings.collection)),
            CollectionMode::GetOrCreate => http_client.post(&collections_url).json(&json!({
                "name": settings.collection,
                "metadata": { "description": COLLECTION_DESCRIPTION },
                "get_or_create": true
            })),
        };

        let response = request.header(TOKEN_HEADER, &settings.token).send().await?;
        if !response.status().is_success() {
            return Err(AppError::from_response(SERVICE, response).await);
        }

        let collection: Collection = response.json().await.map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse Chroma collection: {}", e))
        })?;

        tracing::info!(
            collection = %collection.name,
            collection_id = %collection.id,
            tenant = %settings.tenant,
            database = %settings.database,
            "Connected to Chroma collection"
        );

        Ok(Self {
            http_client,
            collection_url: format!("{}/{}", collections_url, collection.id),
            token: settings.token.clone(),
        })
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(TOKEN_HEADER, &self.token)
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.collection_url, action);
        let response = self
            .request(self.http_client.post(&url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::from_response(SERVICE, response).await);
        }

        response.json().await.map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse Chroma {} response: {}", action, e))
        })
    }
}

/// Zips Chroma's column-oriented query result into neighbors.
///
/// Entries without a distance are dropped; missing metadata becomes empty.
fn neighbors_from_query(response: QueryResponse) -> Vec<Neighbor> {
    let ids = response.ids.into_iter().next().unwrap_or_default();
    let distances = response
        .distances
        .and_then(|d| d.into_iter().next())
        .unwrap_or_default();
    let mut metadatas = response
        .metadatas
        .and_then(|m| m.into_iter().next())
        .unwrap_or_default()
        .into_iter();

    ids.into_iter()
        .zip(distances)
        .filter_map(|(id, distance)| {
            let metadata = metadatas.next().flatten().unwrap_or_default();
            distance.map(|distance| Neighbor {
                id,
                metadata,
                distance,
            })
        })
        .collect()
}

#[async_trait::async_trait]
impl VectorStore for ChromaStore {
    async fn contains(&self, id: &str) -> AppResult<bool> {
        let response: GetResponse = self
            .post("get", json!({ "ids": [id], "include": [] }))
            .await?;
        Ok(response.ids.iter().any(|stored| stored == id))
    }

    async fn add(&self, entry: &VectorEntry) -> AppResult<()> {
        let request = AddRequest {
            ids: [entry.id.as_str()],
            embeddings: [entry.embedding.as_slice()],
            documents: [entry.document.as_str()],
            metadatas: [&entry.metadata],
        };

        let url = format!("{}/add", self.collection_url);
        let response = self
            .request(self.http_client.post(&url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::from_response(SERVICE, response).await);
        }

        tracing::debug!(id = %entry.id, "Entry added to Chroma");
        Ok(())
    }

    async fn query(&self, embedding: &[f32], k: usize) -> AppResult<Vec<Neighbor>> {
        let response: QueryResponse = self
            .post(
                "query",
                json!({
                    "query_embeddings": [embedding],
                    "n_results": k,
                    "include": ["metadatas", "distances"]
                }),
            )
            .await?;

        let mut neighbors = neighbors_from_query(response);
        neighbors.truncate(k);

        tracing::debug!(requested = k, returned = neighbors.len(), "Chroma query completed");
        Ok(neighbors)
    }

    async fn count(&self) -> AppResult<usize> {
        let url = format!("{}/count", self.collection_url);
        let response = self.request(self.http_client.get(&url)).send().await?;

        if !response.status().is_success() {
            return Err(AppError::from_response(SERVICE, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse Chroma count: {}", e)))
    }

    async fn list(&self) -> AppResult<Vec<StoredMovie>> {
        let response: GetResponse = self
            .post("get", json!({ "include": ["metadatas"] }))
            .await?;

        let mut metadatas = response.metadatas.unwrap_or_default().into_iter();
        Ok(response
            .ids
            .into_iter()
            .map(|id| StoredMovie {
                id,
                title: metadatas.next().flatten().and_then(|m| m.title),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "chroma"
    }
}
