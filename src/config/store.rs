//! Durable storage for the API key.
//!
//! The settings surface writes a single key; the background collaborator
//! reads it on every request so a newly saved key applies immediately.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::credentials::{ApiKey, SecureString};

/// Errors from reading or writing stored credentials.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access credentials file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credentials file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize credentials: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Storage for the single API key.
pub trait CredentialStore: Send + Sync {
    /// The stored key, if any.
    fn load(&self) -> Result<Option<SecureString>, StoreError>;

    /// Replace the stored key.
    fn save(&self, key: &ApiKey) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// TOML-file backed store. Reads take a shared lock and writes an
/// exclusive one; on Unix the file is readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<SecureString>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        FileExt::lock_shared(&file).map_err(|e| self.io_error(e))?;
        let _unlock = scopeguard::guard(&file, |f| {
            let _ = FileExt::unlock(f);
        });

        let mut content = String::new();
        (&file)
            .read_to_string(&mut content)
            .map_err(|e| self.io_error(e))?;
        let file: CredentialsFile = toml::from_str(&content).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(file
            .api_key
            .filter(|key| !key.is_empty())
            .map(SecureString::new))
    }

    fn save(&self, key: &ApiKey) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let content = toml::to_string(&CredentialsFile {
            api_key: Some(key.secret().expose().to_string()),
        })?;

        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&self.path).map_err(|e| self.io_error(e))?;
        file.lock_exclusive().map_err(|e| self.io_error(e))?;
        let _unlock = scopeguard::guard(&file, |f| {
            let _ = FileExt::unlock(f);
        });

        // An existing file keeps its mode on open.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }

        file.set_len(0).map_err(|e| self.io_error(e))?;
        (&file)
            .write_all(content.as_bytes())
            .map_err(|e| self.io_error(e))?;
        (&file).flush().map_err(|e| self.io_error(e))?;

        tracing::info!(path = %self.path.display(), "API key saved");
        Ok(())
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<SecureString>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: ApiKey) -> Self {
        Self {
            key: Mutex::new(Some(key.into_secret())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<SecureString>, StoreError> {
        Ok(self.key.lock().clone())
    }

    fn save(&self, key: &ApiKey) -> Result<(), StoreError> {
        *self.key.lock() = Some(key.secret().clone());
        Ok(())
    }
}
