use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Summarization endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the Messages API (e.g., "https://api.anthropic.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Upper bound on generated tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Input size policy applied before anything is sent upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Inputs longer than this many characters are cut down to it.
    #[serde(default = "default_truncate_at")]
    pub truncate_at: usize,
    /// Inputs longer than this many characters are refused outright.
    #[serde(default = "default_reject_at")]
    pub reject_at: usize,
}

/// Where the summarize affordance goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Next to the host's message toolbar when one is recognised.
    #[default]
    Contextual,
    /// Always the fixed-position button in the agent's own container.
    Fixed,
}

/// Page agent timing and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// First placement attempt after install.
    #[serde(default = "default_initial_delay")]
    pub initial_placement_delay_ms: u64,
    /// Second attempt, for hosts that render slowly.
    #[serde(default = "default_late_delay")]
    pub late_placement_delay_ms: u64,
    /// How long the copy button shows its confirmation.
    #[serde(default = "default_copy_feedback")]
    pub copy_feedback_ms: u64,
    #[serde(default)]
    pub placement: PlacementMode,
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_timeout() -> u64 {
    60
}

fn default_truncate_at() -> usize {
    100_000
}

fn default_reject_at() -> usize {
    120_000
}

fn default_initial_delay() -> u64 {
    1000
}

fn default_late_delay() -> u64 {
    3000
}

fn default_copy_feedback() -> u64 {
    2000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            truncate_at: default_truncate_at(),
            reject_at: default_reject_at(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            initial_placement_delay_ms: default_initial_delay(),
            late_placement_delay_ms: default_late_delay(),
            copy_feedback_ms: default_copy_feedback(),
            placement: PlacementMode::default(),
        }
    }
}
