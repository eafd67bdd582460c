//! Size policy applied to email text before it goes upstream.

use crate::config::LimitsConfig;

use super::error::SummarizeError;

/// Email text that passed the size policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInput {
    pub text: String,
    pub truncated: bool,
}

/// Rejects empty and oversized input; silently truncates large input.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPolicy {
    truncate_at: usize,
    reject_at: usize,
}

impl InputPolicy {
    pub fn new(truncate_at: usize, reject_at: usize) -> Self {
        Self {
            truncate_at,
            reject_at,
        }
    }

    pub fn prepare(&self, text: &str) -> Result<PreparedInput, SummarizeError> {
        if text.trim().is_empty() {
            return Err(SummarizeError::EmptyInput);
        }

        let length = text.chars().count();
        if length > self.reject_at {
            return Err(SummarizeError::TooLong {
                length,
                limit: self.reject_at,
            });
        }

        if length <= self.truncate_at {
            return Ok(PreparedInput {
                text: text.to_string(),
                truncated: false,
            });
        }

        let cut = text
            .char_indices()
            .nth(self.truncate_at)
            .map(|(index, _)| index)
            .unwrap_or(text.len());
        Ok(PreparedInput {
            text: text[..cut].to_string(),
            truncated: true,
        })
    }
}

impl From<&LimitsConfig> for InputPolicy {
    fn from(limits: &LimitsConfig) -> Self {
        Self::new(limits.truncate_at, limits.reject_at)
    }
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}
