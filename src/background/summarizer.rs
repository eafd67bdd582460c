//! Client for the Anthropic Messages API.
//!
//! Exactly one outbound call per request, no retries.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{ApiConfig, SecureString};

use super::error::SummarizeError;

/// Appended when the model stopped because it hit `max_tokens`.
pub const OUTPUT_TRUNCATED_NOTICE: &str = "\n\n(Summary was truncated due to length.)";

/// Fixed prompt asking for the four sections the page renders as headers.
const SUMMARIZE_PROMPT: &str = r#"Analyze this email and respond with exactly four sections using these headers:

**Summary**
A concise overview of the email in 3-5 bullet points.

**Action Points**
List all tasks, to-dos, or actions required. If none, write "None identified."

**Deadlines**
List any deadlines mentioned or tightly inferred from the email, with their dates. If none, write "None identified."

**Events**
List all events mentioned. Show dated events first (with dates), then undated events. If none, write "None identified."

Email:

"#;

/// Something that turns email text into a summary.
#[async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(
        &self,
        api_key: &SecureString,
        email_text: &str,
    ) -> Result<String, SummarizeError>;
}

/// Messages API client.
pub struct AnthropicSummarizer {
    client: Client,
    config: ApiConfig,
}

impl AnthropicSummarizer {
    pub fn new(config: ApiConfig) -> Result<Self, SummarizeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, email_text: &str) -> ApiRequest {
        ApiRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: format!("{}{}", SUMMARIZE_PROMPT, email_text),
            }],
        }
    }
}

#[async_trait]
impl Summarize for AnthropicSummarizer {
    async fn summarize(
        &self,
        api_key: &SecureString,
        email_text: &str,
    ) -> Result<String, SummarizeError> {
        let request_body = self.build_request(email_text);
        let url = self.endpoint();

        tracing::debug!(
            url = %url,
            model = %self.config.model,
            input_chars = email_text.chars().count(),
            "Sending summarization request"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-api-key", api_key.expose())
            .header("anthropic-version", "2023-06-01")
            .json(&request_body)
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            tracing::warn!(
                status = %status,
                latency_ms,
                "Summarization API error"
            );

            return Err(SummarizeError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let response_text = response.text().await?;
        let response_body: ApiResponse = serde_json::from_str(&response_text)
            .map_err(|e| SummarizeError::ParseError(e.to_string()))?;

        let summary = extract_summary(response_body)?;
        tracing::info!(latency_ms, summary_chars = summary.len(), "Summary received");
        Ok(summary)
    }
}

/// Pull the first text block out of a response, noting output truncation.
fn extract_summary(response: ApiResponse) -> Result<String, SummarizeError> {
    let mut summary = response
        .content
        .into_iter()
        .find(|block| block.content_type == "text")
        .and_then(|block| block.text)
        .filter(|text| !text.is_empty())
        .ok_or(SummarizeError::EmptyResponse)?;

    if response.stop_reason.as_deref() == Some("max_tokens") {
        summary.push_str(OUTPUT_TRUNCATED_NOTICE);
    }
    Ok(summary)
}

/// Anthropic Messages API request format.
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Anthropic Messages API response format.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}
