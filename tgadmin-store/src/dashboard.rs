//! Dashboard summary.
//!
//! Six panels loaded concurrently through the shared cache: four resource
//! totals, the pending payments and the subscriptions expiring soon. Each key
//! lives under its resource, so mutations in any list view invalidate the
//! matching panel too.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tgadmin_client::{ApiClient, ApiError};
use tgadmin_core::{ListQuery, QueryKey, Record, Resource};
use tracing::{debug, warn};

use crate::cache::{QueryData, SharedCache};
use crate::list_view::ListSource;
use crate::settings_store::DEFAULT_EXPIRING_DAYS;

/// Source of the non-list dashboard panels.
#[async_trait]
pub trait DashboardSource: ListSource {
    /// Payments awaiting review.
    async fn pending_payments(&self) -> Result<Vec<Record>, ApiError>;

    /// Subscriptions expiring within `days`.
    async fn expiring_subscriptions(&self, days: u32) -> Result<Vec<Record>, ApiError>;
}

#[async_trait]
impl DashboardSource for ApiClient {
    async fn pending_payments(&self) -> Result<Vec<Record>, ApiError> {
        self.payments().pending().await
    }

    async fn expiring_subscriptions(&self, days: u32) -> Result<Vec<Record>, ApiError> {
        self.subscriptions().expiring(days).await
    }
}

/// One dashboard panel: a value, or the error that replaced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel<T> {
    /// Loaded value.
    pub value: Option<T>,
    /// Error text of a failed load.
    pub error: Option<String>,
}

impl<T> Panel<T> {
    fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Self {
                value: Some(value),
                error: None,
            },
            Err(e) => Self {
                value: None,
                error: Some(e.notice_text()),
            },
        }
    }

    /// Returns true if the panel loaded.
    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }
}

/// Loaded dashboard panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Total users.
    pub total_users: Panel<u64>,
    /// Total bot instances.
    pub total_bots: Panel<u64>,
    /// Total subscriptions.
    pub total_subscriptions: Panel<u64>,
    /// Total payments.
    pub total_payments: Panel<u64>,
    /// Payments awaiting review.
    pub pending_payments: Panel<Vec<Record>>,
    /// Subscriptions expiring within `expiring_days`.
    pub expiring_subscriptions: Panel<Vec<Record>>,
    /// Look-ahead window of the expiring panel.
    pub expiring_days: u32,
}

impl DashboardSummary {
    /// Number of pending payments, if loaded.
    pub fn pending_count(&self) -> Option<usize> {
        self.pending_payments.value.as_ref().map(Vec::len)
    }

    /// Number of expiring subscriptions, if loaded.
    pub fn expiring_count(&self) -> Option<usize> {
        self.expiring_subscriptions.value.as_ref().map(Vec::len)
    }

    /// Returns true if every panel failed.
    pub fn all_failed(&self) -> bool {
        !(self.total_users.is_loaded()
            || self.total_bots.is_loaded()
            || self.total_subscriptions.is_loaded()
            || self.total_payments.is_loaded()
            || self.pending_payments.is_loaded()
            || self.expiring_subscriptions.is_loaded())
    }
}

/// Dashboard loader.
pub struct Dashboard<S> {
    source: Arc<S>,
    cache: SharedCache,
    expiring_days: u32,
}

impl<S: DashboardSource> Dashboard<S> {
    /// Creates a loader over a source and the shared cache.
    pub fn new(source: Arc<S>, cache: SharedCache) -> Self {
        Self {
            source,
            cache,
            expiring_days: DEFAULT_EXPIRING_DAYS,
        }
    }

    /// Sets the expiring-subscriptions window.
    #[must_use]
    pub fn with_expiring_days(mut self, days: u32) -> Self {
        self.expiring_days = days.max(1);
        self
    }

    /// Cache key of the pending payments panel.
    pub fn pending_key() -> QueryKey {
        QueryKey::new(Resource::Payments).with("view", "pending")
    }

    /// Cache key of the expiring subscriptions panel.
    pub fn expiring_key(days: u32) -> QueryKey {
        QueryKey::new(Resource::Subscriptions)
            .with("view", "expiring")
            .with("days", days)
    }

    /// Loads every panel concurrently. A failed panel carries its error;
    /// the others still load.
    pub async fn load(&self) -> DashboardSummary {
        debug!(expiring_days = self.expiring_days, "Loading dashboard");

        let (users, bots, subscriptions, payments, pending, expiring) = futures::join!(
            self.total(Resource::Users),
            self.total(Resource::Bots),
            self.total(Resource::Subscriptions),
            self.total(Resource::Payments),
            self.pending(),
            self.expiring(),
        );

        let summary = DashboardSummary {
            total_users: Panel::from_result(users),
            total_bots: Panel::from_result(bots),
            total_subscriptions: Panel::from_result(subscriptions),
            total_payments: Panel::from_result(payments),
            pending_payments: Panel::from_result(pending),
            expiring_subscriptions: Panel::from_result(expiring),
            expiring_days: self.expiring_days,
        };
        if summary.all_failed() {
            warn!("Every dashboard panel failed");
        }
        summary
    }

    async fn total(&self, resource: Resource) -> Result<u64, ApiError> {
        let query = ListQuery::new(resource).size(1);
        let key = query.key();
        let source = Arc::clone(&self.source);
        let data = self
            .cache
            .fetch(&key, || async move {
                source.list(&query).await.map(QueryData::Page)
            })
            .await?;
        Ok(data.as_page().map_or(0, |p| p.total))
    }

    async fn pending(&self) -> Result<Vec<Record>, ApiError> {
        let source = Arc::clone(&self.source);
        let data = self
            .cache
            .fetch(&Self::pending_key(), || async move {
                source.pending_payments().await.map(QueryData::Records)
            })
            .await?;
        Ok(data.as_records().map(<[Record]>::to_vec).unwrap_or_default())
    }

    async fn expiring(&self) -> Result<Vec<Record>, ApiError> {
        let days = self.expiring_days;
        let source = Arc::clone(&self.source);
        let data = self
            .cache
            .fetch(&Self::expiring_key(days), || async move {
                source
                    .expiring_subscriptions(days)
                    .await
                    .map(QueryData::Records)
            })
            .await?;
        Ok(data.as_records().map(<[Record]>::to_vec).unwrap_or_default())
    }
}
