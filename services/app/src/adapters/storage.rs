//! services/app/src/adapters/storage.rs
//!
//! This module contains the on-disk profile store. It implements the
//! `ProfileStore` port from the `core` crate over a single JSON blob,
//! the per-installation equivalent of the browser's key-value storage.
//!
//! Corruption policy: an unreadable or unparseable blob is logged and
//! treated as "no profiles". It must never crash the application or surface
//! as a user-visible error.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use chefsync_core::domain::UserProfile;
use chefsync_core::ports::{PortError, PortResult, ProfileStore};

/// An adapter that persists the full profile collection as one JSON file.
#[derive(Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a new `JsonFileStore` rooted at the given blob path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ProfileStore for JsonFileStore {
    async fn load_all(&self) -> PortResult<Vec<UserProfile>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no profile blob yet, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(PortError::Unexpected(format!(
                    "cannot read profile store {}: {err}",
                    self.path.display()
                )))
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(profiles) => Ok(profiles),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    %err,
                    "corrupted profile blob, treating store as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn save_all(&self, profiles: &[UserProfile]) -> PortResult<()> {
        let raw = serde_json::to_vec_pretty(profiles)
            .map_err(|e| PortError::Unexpected(format!("profiles not serializable: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    PortError::Unexpected(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }

        // Write-then-rename so a reader never observes a torn blob.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &raw)
            .await
            .map_err(|e| PortError::Unexpected(format!("cannot write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            PortError::Unexpected(format!("cannot replace {}: {e}", self.path.display()))
        })?;
        Ok(())
    }
}
