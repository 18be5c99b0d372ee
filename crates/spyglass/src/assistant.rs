//! Query responder: the dataset-aware assistant.
//!
//! Serializes the whole table once, wraps every question in a fixed
//! instructional template, and maps every failure to a displayable
//! string. Callers always get text back.

use gemini_api::{Error, GeminiClient};
use spyglass_core::Table;
use spyglass_data::{table_to_csv, DataError};

/// Fixed reply when the remote call is rate limited.
pub const RATE_LIMIT_ADVISORY: &str =
    "Rate limit exceeded. Please wait a minute before trying again.";

/// Dataset-aware assistant wrapping the Gemini client.
///
/// Constructed once at startup and passed explicitly to whoever needs
/// it. The CSV dump is prepared at construction since the table never
/// changes within a session.
pub struct Assistant {
    client: GeminiClient,
    symbol: String,
    table_csv: String,
}

impl Assistant {
    pub fn new(
        client: GeminiClient,
        symbol: impl Into<String>,
        table: &Table,
    ) -> Result<Self, DataError> {
        Ok(Self {
            client,
            symbol: symbol.into(),
            table_csv: table_to_csv(table)?,
        })
    }

    /// Answer a question about the dataset.
    ///
    /// Infallible by contract: transport and quota errors come back as
    /// strings for the transcript, never as errors.
    pub async fn answer(&self, question: &str) -> String {
        let prompt = build_prompt(&self.symbol, &self.table_csv, question);
        match self.client.generate_content(&prompt).await {
            Ok(reply) => reply,
            Err(err) => describe_error(&err),
        }
    }
}

/// The fixed instructional template, with the whole dataset inlined.
fn build_prompt(symbol: &str, table_csv: &str, question: &str) -> String {
    format!(
        "I have loaded the {symbol} stock data. The data includes timestamp, \
trading direction (SHORT/LONG), support and resistance levels, OHLC prices, \
and volume. \n\
Here is the data in CSV format:\n\
{table_csv}\n\n\
Please analyze this data and answer the following question:\n\
{question}\n\n\
Please provide a detailed analysis with specific data points from the CSV. \
Include relevant statistics, trends, and insights."
    )
}

/// Map a failed call to the string shown in the transcript.
///
/// Anything identifiable as a rate-limit condition (the typed 429, or
/// any error whose text mentions one) gets the fixed advisory,
/// whatever else the error says.
fn describe_error(err: &Error) -> String {
    let detail = err.to_string();
    if err.is_rate_limited() || detail.contains("429") {
        RATE_LIMIT_ADVISORY.to_string()
    } else {
        format!("Error: {detail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemini_api::ApiError;

    #[test]
    fn test_prompt_embeds_data_and_question() {
        let prompt = build_prompt("TSLA", "timestamp,open\n2023-01-03,100\n", "Highest close?");

        assert!(prompt.starts_with("I have loaded the TSLA stock data."));
        assert!(prompt.contains("Here is the data in CSV format:\ntimestamp,open\n2023-01-03,100\n"));
        assert!(prompt.contains("answer the following question:\nHighest close?"));
    }

    #[test]
    fn test_rate_limit_error_gets_fixed_advisory() {
        let err = Error::RateLimited {
            retry_after_ms: None,
        };
        assert_eq!(describe_error(&err), RATE_LIMIT_ADVISORY);
    }

    #[test]
    fn test_429_in_error_text_gets_fixed_advisory() {
        // Not typed as a rate limit, but the text mentions 429.
        let err = Error::Api(ApiError::new(
            500,
            "upstream proxy said 429 too many requests",
        ));
        assert_eq!(describe_error(&err), RATE_LIMIT_ADVISORY);
    }

    #[test]
    fn test_other_errors_keep_their_detail() {
        let err = Error::Api(ApiError::new(400, "invalid request"));
        let text = describe_error(&err);
        assert!(text.starts_with("Error: "));
        assert!(text.contains("invalid request"));

        assert!(describe_error(&Error::MissingApiKey).starts_with("Error: "));
    }
}
