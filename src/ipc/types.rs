use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

/// Message from the page agent to the background collaborator.
///
/// Serialises as `{ "action": "summarize", "text": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RuntimeRequest {
    Summarize { text: String },
}

/// Outcome of one summarization request.
///
/// Serialises as `{ "summary": "...", "truncated": bool }` or
/// `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryResult {
    Success {
        #[serde(rename = "summary")]
        text: String,
        #[serde(rename = "truncated", default)]
        was_truncated: bool,
    },
    Failure {
        #[serde(rename = "error")]
        message: String,
    },
}

impl SummaryResult {
    pub fn success(text: impl Into<String>, was_truncated: bool) -> Self {
        Self::Success {
            text: text.into(),
            was_truncated,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

/// The channel could not deliver a request or return its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IpcError {
    #[error("Runtime channel disconnected")]
    Disconnected,
}

pub enum RuntimeCommand {
    Message {
        request: RuntimeRequest,
        respond_to: oneshot::Sender<SummaryResult>,
    },
}
