//! Error types for the Gemini API client.

use std::fmt;

/// Result type alias for Gemini API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Gemini API client.
#[derive(Debug)]
pub enum Error {
    /// HTTP request failed
    Http(reqwest::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
    /// API returned an error response
    Api(ApiError),
    /// Missing API credential (GEMINI_API_KEY)
    MissingApiKey,
    /// Rate limit exceeded
    RateLimited {
        /// Retry after this many milliseconds (if provided)
        retry_after_ms: Option<u64>,
    },
    /// The model returned no usable candidate text
    EmptyResponse,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::Api(e) => write!(f, "API error: {e}"),
            Error::MissingApiKey => write!(f, "missing GEMINI_API_KEY credential"),
            Error::RateLimited { retry_after_ms } => {
                if let Some(ms) = retry_after_ms {
                    write!(f, "Rate limited (429), retry after {ms}ms")
                } else {
                    write!(f, "Rate limited (429)")
                }
            }
            Error::EmptyResponse => write!(f, "model returned no candidate text"),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl Error {
    /// Check if this error is a rate-limit condition.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Error::RateLimited { .. } => true,
            Error::Api(e) => e.is_rate_limited(),
            _ => false,
        }
    }
}

/// Error payload returned inside the Google API error envelope.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiError {
    /// HTTP-style error code from the API
    pub code: i32,
    /// Error message
    pub message: String,
    /// Canonical status string (e.g. `RESOURCE_EXHAUSTED`)
    #[serde(default)]
    pub status: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            Some(status) => write!(f, "[{} {}] {}", self.code, status, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        self.code == 429 || self.status.as_deref() == Some("RESOURCE_EXHAUSTED")
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.code, 401 | 403)
    }

    /// Check if this is an invalid request error.
    pub fn is_invalid_argument(&self) -> bool {
        self.code == 400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_variants() {
        assert!(Error::RateLimited {
            retry_after_ms: None
        }
        .is_rate_limited());
        assert!(Error::Api(ApiError::new(429, "quota")).is_rate_limited());

        let exhausted = ApiError {
            code: 429,
            message: "out of quota".to_string(),
            status: Some("RESOURCE_EXHAUSTED".to_string()),
        };
        assert!(Error::Api(exhausted).is_rate_limited());

        assert!(!Error::Api(ApiError::new(500, "boom")).is_rate_limited());
        assert!(!Error::MissingApiKey.is_rate_limited());
    }

    #[test]
    fn test_display_contains_429() {
        let err = Error::RateLimited {
            retry_after_ms: Some(1500),
        };
        assert!(err.to_string().contains("429"));
    }
}
