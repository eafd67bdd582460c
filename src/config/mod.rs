//! Configuration and credential handling.
//!
//! `config.toml` carries endpoint, limits and agent timing; the API key is
//! kept apart in `credentials.toml` and only ever handled as a
//! [`SecureString`].

mod credentials;
mod loader;
mod store;
mod types;

pub use credentials::{ApiKey, CredentialError, SecureString, API_KEY_PREFIX};
pub use loader::ConfigError;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError};
pub use types::{AgentConfig, ApiConfig, Config, LimitsConfig, PlacementMode};
