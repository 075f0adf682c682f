use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Non-success response from one of the upstream services
    #[error("{service} API returned status {status}: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Upstream answered, but with a body we could not use
    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the failure is transient and the call is worth repeating.
    ///
    /// Connection failures, timeouts, rate limiting (429) and 5xx responses are
    /// transient. Everything else fails the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::HttpClient(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                match e.status() {
                    Some(status) => is_transient_status(status.as_u16()),
                    None => e.is_request(),
                }
            }
            AppError::Upstream { status, .. } => is_transient_status(*status),
            AppError::NotFound(_)
            | AppError::InvalidInput(_)
            | AppError::ExternalApi(_)
            | AppError::Internal(_) => false,
        }
    }

    /// Builds an `Upstream` error from a failed response, consuming its body.
    pub async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        AppError::Upstream {
            service,
            status,
            message,
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::HttpClient(_)
            | AppError::Upstream { .. }
            | AppError::ExternalApi(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        // The browser client reads `detail`
        let body = Json(json!({
            "detail": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
