/// OpenAI client
///
/// One client serves two roles: overview embeddings (`/embeddings`) and the
/// one-sentence similarity explanations (`/chat/completions`).
use crate::{
    error::{AppError, AppResult},
    services::providers::{EmbeddingProvider, ExplanationProvider},
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "OpenAI";
const EXPLANATION_MAX_TOKENS: u32 = 100;
const EXPLANATION_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    embedding_model: String,
    chat_model: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        api_url: String,
        embedding_model: String,
        chat_model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            embedding_model,
            chat_model,
        })
    }

    async fn post<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> AppResult<R> {
        let url = format!("{}/{}", self.api_url, endpoint);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::from_response(SERVICE, response).await);
        }

        response.json().await.map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse OpenAI {} response: {}", endpoint, e))
        })
    }
}

/// Prompt asking for a single sentence relating the two titles
pub fn explanation_prompt(movie: &str, similar: &str) -> String {
    format!(
        "Explain in one sentence why '{}' and '{}' might be similar in terms of plot, themes, or style.",
        movie, similar
    )
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Cannot embed empty text".to_string(),
            ));
        }

        let request = EmbeddingRequest {
            input: text,
            model: &self.embedding_model,
        };

        let response: EmbeddingResponse = self.post("embeddings", &request).await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AppError::ExternalApi("OpenAI returned no embedding".to_string()))?;

        tracing::debug!(
            dimensions = embedding.len(),
            model = %self.embedding_model,
            "Embedding generated"
        );

        Ok(embedding)
    }

    fn name(&self) -> &'static str {
        "openai-embeddings"
    }
}

#[async_trait::async_trait]
impl ExplanationProvider for OpenAiClient {
    async fn explain(&self, movie: &str, similar: &str) -> AppResult<String> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: explanation_prompt(movie, similar),
            }],
            max_tokens: EXPLANATION_MAX_TOKENS,
            temperature: EXPLANATION_TEMPERATURE,
        };

        let response: ChatResponse = self.post("chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AppError::ExternalApi("OpenAI returned an empty completion".to_string()))
    }

    fn name(&self) -> &'static str {
        "openai-chat"
    }
}
