//! File-backed session token store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tgadmin_client::{SessionError, TokenStore};
use tracing::debug;

use crate::error::StoreError;
use crate::persistence::{default_session_path, load_json, remove_file, save_json};

/// On-disk session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    access_token: String,
    saved_at: DateTime<Utc>,
}

/// Token store that keeps the token in a 0600 JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(default_session_path())
    }
}

impl FileTokenStore {
    /// Creates a store at a path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn to_session_error(err: StoreError) -> SessionError {
    match err {
        StoreError::Io(e) => SessionError::Io(e),
        other => SessionError::Backend(other.to_string()),
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file: SessionFile = load_json(&self.path).await.map_err(to_session_error)?;
        debug!(path = %self.path.display(), saved_at = %file.saved_at, "Session file loaded");
        Ok(Some(file.access_token).filter(|t| !t.is_empty()))
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        let file = SessionFile {
            access_token: token.to_string(),
            saved_at: Utc::now(),
        };
        save_json(&self.path, &file).await.map_err(to_session_error)
    }

    async fn clear(&self) -> Result<(), SessionError> {
        remove_file(&self.path).await.map_err(to_session_error)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
