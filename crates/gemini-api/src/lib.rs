//! # Gemini API Client Library
//!
//! A small Rust client for the Google Gemini `generateContent` endpoint.
//!
//! ## Features
//!
//! - **Single-turn generation**: one prompt in, one text reply out
//! - **Safety configuration**: request-level safety settings, permissive
//!   by default for analytical workloads
//! - **Rate limiting**: fixed minimum delay between requests
//! - **Type safety**: strongly typed request/response models
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gemini_api::GeminiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gemini_api::Error> {
//!     // Reads GEMINI_API_KEY from the environment
//!     let client = GeminiClient::from_env()?;
//!
//!     let reply = client.generate_content("Summarize this dataset").await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! use gemini_api::{Config, GeminiClient};
//! use std::time::Duration;
//!
//! let config = Config::new("api-key")
//!     .with_model("gemini-1.5-pro")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_min_request_interval(Duration::from_secs(2));
//!
//! let client = GeminiClient::new(config)?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod types;

// Re-exports for convenience
pub use client::GeminiClient;
pub use config::Config;
pub use error::{ApiError, Error, Result};
pub use rate_limit::RateLimiter;
pub use types::{GenerateContentRequest, GenerateContentResponse, SafetySetting};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL for the Gemini generative language API
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
