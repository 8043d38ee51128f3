//! Classification of HTTP failures returned by the integration API.

use reqwest::{Response, StatusCode};
use serde::Deserialize;

/// A non-success response from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 404. For resources that are provisioned asynchronously this means
    /// "not ready yet" rather than "does not exist".
    NotFound(String),
    /// HTTP 401
    Unauthorized(String),
    /// HTTP 403
    Forbidden(String),
    /// Any other 4xx status
    BadRequest(u16, String),
    /// 5xx status
    Server(u16, String),
}

impl ApiError {
    /// Builds an error from a status code and the server's message, if any.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let code = status.as_u16();
        match status {
            StatusCode::NOT_FOUND => {
                ApiError::NotFound(message.unwrap_or_else(|| "resource not found".to_string()))
            }
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(
                message.unwrap_or_else(|| "invalid or missing token".to_string()),
            ),
            StatusCode::FORBIDDEN => ApiError::Forbidden(
                message.unwrap_or_else(|| "insufficient privileges".to_string()),
            ),
            s if s.is_client_error() => {
                ApiError::BadRequest(code, message.unwrap_or_else(|| format!("HTTP {}", code)))
            }
            _ => ApiError::Server(code, message.unwrap_or_else(|| format!("HTTP {}", code))),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::BadRequest(code, _) | ApiError::Server(code, _) => *code,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Unauthorized(msg) => {
                write!(f, "Authentication failed: {}. Check your ALM_TOKEN.", msg)
            }
            ApiError::Forbidden(msg) => write!(f, "Access forbidden: {}", msg),
            ApiError::BadRequest(code, msg) => write!(f, "Request error (HTTP {}): {}", code, msg),
            ApiError::Server(code, msg) => write!(f, "Server error (HTTP {}): {}", code, msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Error body returned by the server: `{"errors":[{"msg":"..."}]}`.
#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Deserialize, Debug)]
struct ErrorEntry {
    msg: String,
}

fn parse_error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let messages: Vec<String> = parsed.errors.into_iter().map(|e| e.msg).collect();
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

/// Classifies a `reqwest` error. Errors without a status (connection
/// failures, timeouts) are returned unchanged.
pub fn classify_error(error: reqwest::Error) -> anyhow::Error {
    match error.status() {
        Some(status) => anyhow::Error::from(ApiError::from_status(status, None)),
        None => anyhow::Error::from(error),
    }
}

/// Passes a successful response through, or turns a failed one into an
/// [`ApiError`] carrying the server's message.
pub async fn check_status(response: Response) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(anyhow::Error::from(ApiError::from_status(
        status,
        parse_error_message(&body),
    )))
}

/// Returns true when the error chain contains a 404 from the server.
pub fn is_not_found(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| matches!(cause.downcast_ref::<ApiError>(), Some(ApiError::NotFound(_))))
}
