//! Session token ownership and persistence.
//!
//! The [`Session`] holds the bearer token for the lifetime of a login. It is
//! created on successful login and destroyed on logout or on the first 401.
//! The token is mirrored into a [`TokenStore`] so it survives restarts:
//!
//! - [`KeyringTokenStore`] - System keychain (macOS Keychain, Windows
//!   Credential Manager, Linux Secret Service)
//! - [`MemoryTokenStore`] - Process memory only
//!
//! The file-backed store lives in `tgadmin-store`.

use async_trait::async_trait;
use keyring::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::SessionError;

/// Keychain service name.
pub const KEYCHAIN_SERVICE: &str = "tgadmin";

/// Keychain account name for the session token.
pub const KEYCHAIN_ACCOUNT: &str = "session_token";

// ============================================================================
// Token Store Trait
// ============================================================================

/// Persistent storage for the session token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the stored token, if any.
    async fn load(&self) -> Result<Option<String>, SessionError>;

    /// Stores a token, replacing any previous one.
    async fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Removes the stored token. Succeeds when nothing is stored.
    async fn clear(&self) -> Result<(), SessionError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

// ============================================================================
// Memory Store
// ============================================================================

/// Token store that keeps the token in memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.token.write().await = None;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// ============================================================================
// Keyring Store
// ============================================================================

/// Token store backed by the system keychain.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
    account: String,
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT)
    }
}

impl KeyringTokenStore {
    /// Creates a store for a service/account pair.
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry, SessionError> {
        Entry::new(&self.service, &self.account).map_err(SessionError::from)
    }
}

#[async_trait]
impl TokenStore for KeyringTokenStore {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        debug!(service = %self.service, "Loading session token from keychain");

        match self.entry()?.get_password() {
            Ok(token) if !token.is_empty() => Ok(Some(token)),
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(service = %self.service, error = %e, "Failed to read session token");
                Err(e.into())
            }
        }
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        self.entry()?.set_password(token).map_err(|e| {
            warn!(service = %self.service, error = %e, "Failed to store session token");
            SessionError::from(e)
        })?;

        debug!(service = %self.service, "Session token stored in keychain");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!(service = %self.service, "Session token removed from keychain");
                Ok(())
            }
            Err(e) => {
                warn!(service = %self.service, error = %e, "Failed to remove session token");
                Err(e.into())
            }
        }
    }

    fn name(&self) -> &'static str {
        "keychain"
    }
}

// ============================================================================
// Session
// ============================================================================

/// The authenticated session.
///
/// Every request reads the token at send time, so once [`Session::clear`]
/// returns no later request carries the old token.
pub struct Session {
    token: RwLock<Option<String>>,
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store.name())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates an empty session over a token store.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            token: RwLock::new(None),
            store,
        }
    }

    /// Creates an empty session that persists nothing.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Creates a session, restoring a previously stored token.
    pub async fn restore(store: Arc<dyn TokenStore>) -> Result<Self, SessionError> {
        let token = store.load().await?;
        debug!(backend = store.name(), restored = token.is_some(), "Session restored");
        Ok(Self {
            token: RwLock::new(token),
            store,
        })
    }

    /// Returns the current token.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Returns true if a token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Starts a session with a freshly issued token.
    pub async fn begin(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        self.store.save(&token).await?;
        *self.token.write().await = Some(token);
        info!(backend = self.store.name(), "Session started");
        Ok(())
    }

    /// Ends the session.
    ///
    /// The in-memory token is dropped before the store is touched, so the
    /// token is unusable even if removing it from storage fails.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let had_token = self.token.write().await.take().is_some();
        self.store.clear().await?;
        if had_token {
            info!(backend = self.store.name(), "Session cleared");
        }
        Ok(())
    }

    /// Returns the backing store name.
    pub fn backend(&self) -> &'static str {
        self.store.name()
    }
}

// ============================================================================
// Tests
// ============================================================================
