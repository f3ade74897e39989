//! Session token storage
//!
//! The monitor reads and deletes tokens but never creates them — the login
//! flow owns writes. Storage is behind the [`TokenStore`] trait so tests can
//! substitute an in-memory fake; two backends ship here:
//!
//! - [`MemoryTokenStore`]: in-memory map, for tests and embedders that
//!   manage their own persistence
//! - [`FileTokenStore`]: JSON file under the platform data directory, the
//!   persistent local storage the dashboard uses between launches

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Handle RwLock poison errors consistently
fn handle_lock_poison<T>(e: std::sync::PoisonError<T>) -> Error {
    Error::Store(format!("lock poisoned: {}", e))
}

/// Role a session token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRole {
    /// Administrator session
    Admin,
    /// Generic authenticated session
    User,
}

impl TokenRole {
    /// Both roles, in lookup-priority order (admin first)
    pub const ALL: [TokenRole; 2] = [TokenRole::Admin, TokenRole::User];

    /// Storage key for this role
    #[must_use]
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Admin => "admin_token",
            Self::User => "user_token",
        }
    }

    /// Login route the browser is sent to after this role's session ends
    #[must_use]
    pub fn login_route(&self) -> &'static str {
        match self {
            Self::Admin => "/admin/login",
            Self::User => "/login",
        }
    }
}

impl std::fmt::Display for TokenRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Key/value storage for role-keyed session tokens
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Get the stored token for a role, if any
    async fn get(&self, role: TokenRole) -> Result<Option<String>>;

    /// Store a token for a role, replacing any existing one
    async fn set(&self, role: TokenRole, token: &str) -> Result<()>;

    /// Delete the token for a role. Deleting a missing token is not an error.
    async fn delete(&self, role: TokenRole) -> Result<()>;
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<TokenRole, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, role: TokenRole) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(handle_lock_poison)?;
        Ok(entries.get(&role).cloned())
    }

    async fn set(&self, role: TokenRole, token: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(handle_lock_poison)?;
        entries.insert(role, token.to_string());
        Ok(())
    }

    async fn delete(&self, role: TokenRole) -> Result<()> {
        let mut entries = self.entries.write().map_err(handle_lock_poison)?;
        entries.remove(&role);
        Ok(())
    }
}

/// Serialized file layout: storage key → token
type TokenFile = HashMap<String, String>;

/// File-backed token store (plain JSON).
///
/// Tokens are opaque bearer credentials the backend already treats as
/// public-client secrets; the file carries the same trust as the browser
/// storage it replaces.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the given file path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the platform data directory
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vigil")
            .join("tokens.json")
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<TokenFile> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| Error::Store(format!("corrupt token file: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TokenFile::new()),
            Err(e) => Err(Error::Store(format!("read {}: {}", self.path.display(), e))),
        }
    }

    async fn save(&self, tokens: &TokenFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Store(format!("create {}: {}", parent.display(), e)))?;
        }
        let bytes = serde_json::to_vec_pretty(tokens)
            .map_err(|e| Error::Store(format!("serialize tokens: {}", e)))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| Error::Store(format!("write {}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, role: TokenRole) -> Result<Option<String>> {
        let tokens = self.load().await?;
        Ok(tokens.get(role.storage_key()).cloned())
    }

    async fn set(&self, role: TokenRole, token: &str) -> Result<()> {
        let mut tokens = self.load().await?;
        tokens.insert(role.storage_key().to_string(), token.to_string());
        self.save(&tokens).await
    }

    async fn delete(&self, role: TokenRole) -> Result<()> {
        let mut tokens = self.load().await?;
        if tokens.remove(role.storage_key()).is_some() {
            self.save(&tokens).await?;
        } else {
            debug!(role = %role, "no token to delete");
        }
        Ok(())
    }
}
