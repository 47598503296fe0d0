use serde::Deserialize;
use thiserror::Error;

/// Fallback message when an error response carries no usable body
const GENERIC_REJECTION: &str = "invalid username or password";

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error body shape used by the login endpoint. FastAPI-style services
/// put the message under `detail`; others use `message`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    message: Option<String>,
}

impl AuthError {
    /// Build a rejection from a non-success response, extracting a
    /// human-readable message from the body when one is present.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.detail.or(e.message))
            .unwrap_or_else(|| GENERIC_REJECTION.to_string());
        tracing::debug!(status = %status, "Login rejected: {}", Self::truncate_body(body));
        AuthError::Rejected(message)
    }

    /// Truncate a response body to avoid logging excessive data.
    /// The cut is backed off to a char boundary; the body may hold
    /// multibyte text (the backend emits localized messages).
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..end],
                body.len()
            )
        }
    }
}
