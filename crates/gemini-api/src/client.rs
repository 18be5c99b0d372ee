//! HTTP client for the Gemini generateContent API.

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};

use crate::config::Config;
use crate::error::{ApiError, Error, Result};
use crate::rate_limit::RateLimiter;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// HTTP client for making requests to the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: Arc<Config>,
    http: Client,
    rate_limiter: RateLimiter,
}

impl GeminiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = RateLimiter::new(config.min_request_interval);

        Ok(Self {
            config: Arc::new(config),
            http,
            rate_limiter,
        })
    }

    /// Create a client from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the rate limiter.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Send a single-turn prompt and return the model's text reply.
    ///
    /// Waits out the minimum request interval first. One shot: a failed
    /// call is reported, not retried.
    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(Error::MissingApiKey)?;

        self.rate_limiter.acquire().await;

        let request = GenerateContentRequest::single_turn(prompt);
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle the API response.
    async fn handle_response(&self, response: Response) -> Result<String> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .map(|s: u64| s * 1000); // Convert seconds to milliseconds

            tracing::warn!(
                "generateContent rate limited, retry after {:?}ms",
                retry_after
            );

            return Err(Error::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
                return Err(Error::Api(envelope.error));
            }

            return Err(Error::Api(ApiError::new(
                status.as_u16() as i32,
                format!("HTTP {}: {}", status, body),
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse response: {}", body);
            Error::Json(e)
        })?;

        parsed.text().ok_or(Error::EmptyResponse)
    }
}

/// Error envelope returned by the API.
#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new(Config::new("key")).unwrap();
        assert_eq!(
            client.endpoint(),
            format!(
                "{}/v1beta/models/{}:generateContent",
                crate::GEMINI_BASE_URL,
                crate::DEFAULT_MODEL
            )
        );

        let client =
            GeminiClient::new(Config::new("key").with_model("gemini-1.5-pro")).unwrap();
        assert!(client.endpoint().ends_with("gemini-1.5-pro:generateContent"));
    }

    #[test]
    fn test_error_envelope_parse() {
        let body = r#"{
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED"
            }
        }"#;

        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.code, 429);
        assert!(envelope.error.is_rate_limited());
        assert!(Error::Api(envelope.error).to_string().contains("429"));
    }
}
