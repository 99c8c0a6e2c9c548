//! Shared command context: settings, session, client and cache.

use anyhow::{Context, Result};
use std::sync::Arc;
use tgadmin_client::{ApiClient, ApiError, KeyringTokenStore, Session, TokenStore};
use tgadmin_core::{ListQuery, Resource};
use tgadmin_store::{
    Dashboard, FileTokenStore, ListView, QueryCache, SessionBackend, Settings, SettingsStore,
    SharedCache,
};
use tracing::debug;

use crate::Cli;

/// Everything a command needs to talk to the backend.
pub struct AppContext {
    pub settings: Settings,
    pub client: Arc<ApiClient>,
    pub cache: SharedCache,
}

impl AppContext {
    /// Loads settings, restores the stored session and builds the client.
    pub async fn load(cli: &Cli) -> Result<Self> {
        let store = SettingsStore::load_default().await?;
        let settings = store.get().await;

        let tokens: Arc<dyn TokenStore> = match settings.session_backend {
            SessionBackend::Keychain => Arc::new(KeyringTokenStore::default()),
            SessionBackend::File => Arc::new(FileTokenStore::default()),
        };
        let session = Session::restore(tokens)
            .await
            .context("Failed to read the stored session")?;

        let config = settings.client_config(cli.api_url.as_deref());
        debug!(api = %config.api_root(), backend = session.backend(), "Client configured");
        let client = ApiClient::new(&config)?.with_session(Arc::new(session));

        Ok(Self {
            settings,
            client: Arc::new(client),
            cache: Arc::new(QueryCache::new()),
        })
    }

    /// Loads the context and fails fast when no session is stored.
    pub async fn authenticated(cli: &Cli) -> Result<Self> {
        let ctx = Self::load(cli).await?;
        if !ctx.client.session().is_authenticated().await {
            return Err(ApiError::Unauthorized {
                detail: Some("not logged in, run `tgadmin login`".to_string()),
            }
            .into());
        }
        Ok(ctx)
    }

    /// Builds a list view over the shared cache.
    pub fn list_view(&self, query: ListQuery) -> Result<ListView<ApiClient>> {
        Ok(ListView::new(
            Arc::clone(&self.client),
            Arc::clone(&self.cache),
            query,
        )?)
    }

    /// Builds a list view at page 1 with the configured page size.
    pub fn default_view(&self, resource: Resource) -> Result<ListView<ApiClient>> {
        self.list_view(ListQuery::new(resource).size(self.settings.page_size))
    }

    /// Builds the dashboard loader.
    pub fn dashboard(&self, expiring_days: Option<u32>) -> Dashboard<ApiClient> {
        Dashboard::new(Arc::clone(&self.client), Arc::clone(&self.cache))
            .with_expiring_days(expiring_days.unwrap_or(self.settings.expiring_days))
    }
}
