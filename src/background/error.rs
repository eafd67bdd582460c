//! Error taxonomy of the background collaborator.

use num_format::{Locale, ToFormattedString};
use thiserror::Error;

use crate::config::StoreError;

/// Errors that end a summarization request.
///
/// `Display` is the technical form for logs; [`SummarizeError::user_message`]
/// is what the page shows.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("empty input")]
    EmptyInput,

    #[error("input of {length} characters exceeds the {limit} character ceiling")]
    TooLong { length: usize, limit: usize },

    #[error("no API key configured")]
    NotConfigured,

    #[error("credential store unavailable: {0}")]
    Credentials(#[from] StoreError),

    #[error("API returned status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("API response contained no text")]
    EmptyResponse,

    #[error("failed to parse API response: {0}")]
    ParseError(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for SummarizeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            SummarizeError::Network(err.to_string())
        } else {
            SummarizeError::Request(err.to_string())
        }
    }
}

impl SummarizeError {
    /// Human-readable message passed verbatim to the page.
    pub fn user_message(&self) -> String {
        match self {
            SummarizeError::EmptyInput => "No email content provided.".to_string(),
            SummarizeError::TooLong { length, limit } => format!(
                "Selection too long ({} characters). Maximum is {} characters.",
                length.to_formatted_string(&Locale::en),
                limit.to_formatted_string(&Locale::en)
            ),
            SummarizeError::NotConfigured => {
                "No API key configured. Click the extension icon to set your key.".to_string()
            }
            SummarizeError::Credentials(_) => {
                "Could not read the stored API key. Open the extension settings and save it again."
                    .to_string()
            }
            SummarizeError::ApiError { status, .. } => status_message(*status),
            SummarizeError::EmptyResponse | SummarizeError::ParseError(_) => {
                "Received an empty response from Claude. Please try again.".to_string()
            }
            SummarizeError::Network(_) => {
                "Network error. Check your internet connection.".to_string()
            }
            SummarizeError::Request(detail) => format!("Request failed: {}", detail),
        }
    }
}

/// User-facing text for a non-success HTTP status.
pub fn status_message(status: u16) -> String {
    match status {
        401 => "Invalid API key. Check your key in the extension settings.".to_string(),
        403 => "Access denied. Your API key may lack permissions for this model.".to_string(),
        429 => "Rate limit exceeded. Wait a moment and try again.".to_string(),
        529 => "Claude is temporarily overloaded. Try again in a few seconds.".to_string(),
        other => format!("API error ({}). Please try again.", other),
    }
}
