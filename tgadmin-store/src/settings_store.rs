//! User preferences store.
//!
//! Manages settings with persistence and change notification.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tgadmin_client::ClientConfig;
use tgadmin_client::config::DEFAULT_TIMEOUT_SECS;
use tgadmin_core::DEFAULT_PAGE_SIZE;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Default look-ahead window for expiring subscriptions, in days.
pub const DEFAULT_EXPIRING_DAYS: u32 = 7;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend base URL. `None` falls back to the environment or the default.
    pub api_url: Option<String>,

    /// Rows per list page.
    pub page_size: u32,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Where the session token is persisted.
    pub session_backend: SessionBackend,

    /// Log level.
    pub log_level: LogLevel,

    /// Look-ahead window for the expiring subscriptions panel.
    pub expiring_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_backend: SessionBackend::default(),
            log_level: LogLevel::default(),
            expiring_days: DEFAULT_EXPIRING_DAYS,
        }
    }
}

impl Settings {
    /// Names accepted by [`Settings::set_field`].
    pub const FIELDS: &'static [&'static str] = &[
        "api_url",
        "page_size",
        "request_timeout_secs",
        "session_backend",
        "log_level",
        "expiring_days",
    ];

    /// Sets a field from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for an unknown field or a bad value.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), StoreError> {
        let value = value.trim();
        match field {
            "api_url" => {
                self.api_url = (!value.is_empty()).then(|| value.to_string());
            }
            "page_size" => self.page_size = parse_positive(field, value)?,
            "request_timeout_secs" => {
                self.request_timeout_secs = u64::from(parse_positive(field, value)?);
            }
            "session_backend" => {
                self.session_backend = match value {
                    "keychain" => SessionBackend::Keychain,
                    "file" => SessionBackend::File,
                    other => return Err(bad_value(field, other)),
                };
            }
            "log_level" => {
                self.log_level = LogLevel::parse(value).ok_or_else(|| bad_value(field, value))?;
            }
            "expiring_days" => self.expiring_days = parse_positive(field, value)?,
            other => {
                return Err(StoreError::Config(format!("Unknown setting: {other}")));
            }
        }
        Ok(())
    }

    /// Builds the client configuration. `explicit` overrides everything.
    pub fn client_config(&self, explicit: Option<&str>) -> ClientConfig {
        ClientConfig::resolve(explicit, self.api_url.as_deref())
            .with_timeout(Duration::from_secs(self.request_timeout_secs.max(1)))
    }
}

fn parse_positive(field: &str, value: &str) -> Result<u32, StoreError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(bad_value(field, value)),
    }
}

fn bad_value(field: &str, value: &str) -> StoreError {
    StoreError::Config(format!("Invalid value for {field}: {value:?}"))
}

/// Session token persistence backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionBackend {
    /// System keychain.
    #[default]
    Keychain,
    /// `session.json` in the config directory.
    File,
}

impl std::fmt::Display for SessionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionBackend::Keychain => write!(f, "keychain"),
            SessionBackend::File => write!(f, "file"),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl LogLevel {
    /// Parses a level name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Settings store with persistence.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a store with default settings.
    pub fn new(path: PathBuf) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path. A missing or unreadable file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        let store = Self::new(path);
        *store.settings.write().await = settings;
        Ok(store)
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Sets one field from its string form.
    ///
    /// # Errors
    ///
    /// Returns error for an unknown field or an invalid value; the settings
    /// are left unchanged.
    pub async fn set_field(&self, field: &str, value: &str) -> Result<(), StoreError> {
        {
            let mut settings = self.settings.write().await;
            let mut updated = settings.clone();
            updated.set_field(field, value)?;
            *settings = updated;
        }
        self.notify_change().await;
        Ok(())
    }

    /// Restores defaults.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
        info!("Settings reset to defaults");
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Gets the page size.
    pub async fn page_size(&self) -> u32 {
        self.settings.read().await.page_size
    }

    /// Gets the session backend.
    pub async fn session_backend(&self) -> SessionBackend {
        self.settings.read().await.session_backend
    }

    /// Builds the client configuration.
    pub async fn client_config(&self, explicit: Option<&str>) -> ClientConfig {
        self.settings.read().await.client_config(explicit)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, None);
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.session_backend, SessionBackend::Keychain);
        assert_eq!(settings.expiring_days, 7);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"page_size":25,"session_backend":"file"}"#).unwrap();
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.session_backend, SessionBackend::File);
        assert_eq!(settings.expiring_days, DEFAULT_EXPIRING_DAYS);
    }

    #[test]
    fn test_set_field() {
        let mut settings = Settings::default();
        settings.set_field("api_url", "https://admin.example.com").unwrap();
        settings.set_field("page_size", "50").unwrap();
        settings.set_field("log_level", "DEBUG").unwrap();

        assert_eq!(settings.api_url.as_deref(), Some("https://admin.example.com"));
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.log_level, LogLevel::Debug);

        settings.set_field("api_url", "").unwrap();
        assert_eq!(settings.api_url, None);

        assert!(settings.set_field("page_size", "0").is_err());
        assert!(settings.set_field("session_backend", "cloud").is_err());
        assert!(settings.set_field("color", "red").is_err());
    }

    #[test]
    fn test_client_config_timeout() {
        let settings = Settings {
            request_timeout_secs: 5,
            ..Default::default()
        };
        let config = settings.client_config(Some("http://flag:9000"));
        assert_eq!(config.api_url, "http://flag:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_settings_store_update() {
        let store = SettingsStore::new(PathBuf::from("/tmp/tgadmin_test_settings.json"));
        let rx = store.subscribe();

        store.update(|s| s.expiring_days = 14).await;

        assert_eq!(store.get().await.expiring_days, 14);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_failed_set_field_leaves_settings() {
        let store = SettingsStore::new(PathBuf::from("/tmp/tgadmin_test_settings.json"));
        store.set_field("page_size", "20").await.unwrap();
        assert!(store.set_field("page_size", "-1").await.is_err());
        assert_eq!(store.page_size().await, 20);

        store.reset().await;
        assert_eq!(store.get().await, Settings::default());
    }
}
