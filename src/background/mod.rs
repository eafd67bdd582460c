//! Background collaborator.
//!
//! The only component with network access and the only reader of the
//! stored API key. It answers runtime requests from page agents: size
//! policy first, then key lookup, then a single Messages API call.

mod error;
mod policy;
mod summarizer;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, CredentialStore};
use crate::ipc::{MessageHandler, RuntimeRequest, SummaryResult};

pub use error::{status_message, SummarizeError};
pub use policy::{InputPolicy, PreparedInput};
pub use summarizer::{AnthropicSummarizer, Summarize, OUTPUT_TRUNCATED_NOTICE};

/// Request handler behind the runtime channel.
pub struct BackgroundAgent {
    policy: InputPolicy,
    credentials: Arc<dyn CredentialStore>,
    summarizer: Arc<dyn Summarize>,
}

impl BackgroundAgent {
    pub fn new(
        policy: InputPolicy,
        credentials: Arc<dyn CredentialStore>,
        summarizer: Arc<dyn Summarize>,
    ) -> Self {
        Self {
            policy,
            credentials,
            summarizer,
        }
    }

    /// Build the production agent: Messages API client plus the given store.
    pub fn from_config(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, SummarizeError> {
        let summarizer = AnthropicSummarizer::new(config.api.clone())?;
        Ok(Self::new(
            InputPolicy::from(&config.limits),
            credentials,
            Arc::new(summarizer),
        ))
    }

    /// Summarize `text`, returning the summary and whether input was cut.
    pub async fn summarize_text(&self, text: &str) -> Result<(String, bool), SummarizeError> {
        let prepared = self.policy.prepare(text)?;
        if prepared.truncated {
            tracing::info!("Input exceeds truncation threshold, sending leading part only");
        }

        let api_key = self
            .credentials
            .load()?
            .ok_or(SummarizeError::NotConfigured)?;

        let summary = self.summarizer.summarize(&api_key, &prepared.text).await?;
        Ok((summary, prepared.truncated))
    }
}

#[async_trait]
impl MessageHandler for BackgroundAgent {
    async fn handle(&self, request: RuntimeRequest) -> SummaryResult {
        match request {
            RuntimeRequest::Summarize { text } => match self.summarize_text(&text).await {
                Ok((summary, truncated)) => SummaryResult::success(summary, truncated),
                Err(err) => {
                    tracing::warn!(error = %err, "Summarization failed");
                    SummaryResult::failure(err.user_message())
                }
            },
        }
    }
}
