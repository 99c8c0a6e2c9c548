//! Cached list views.
//!
//! A [`ListView`] owns the local state of one list page (page, size, status
//! filter, search text) and reads through the shared [`QueryCache`]. While a
//! new key is loading, the previously displayed page stays visible.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tgadmin_client::{ApiClient, ApiError};
use tgadmin_core::{CoreError, ListQuery, Page, QueryKey, Record, Resource, Tone, page_count};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::cache::{QueryData, SharedCache};
use crate::error::StoreError;

// ============================================================================
// List Source
// ============================================================================

/// Something that can fetch one page of a resource list.
#[async_trait]
pub trait ListSource: Send + Sync {
    /// Fetches the page described by `query`.
    async fn list(&self, query: &ListQuery) -> Result<Page, ApiError>;
}

#[async_trait]
impl ListSource for ApiClient {
    async fn list(&self, query: &ListQuery) -> Result<Page, ApiError> {
        let (page, size) = (query.page, query.size);
        match query.resource {
            Resource::Users => self.users().list(page, size).await,
            Resource::Bots => self.bots().list(page, size).await,
            Resource::Subscriptions => self.subscriptions().list(page, size).await,
            Resource::Payments => {
                self.payments()
                    .list(page, size, query.status.as_deref())
                    .await
            }
            Resource::Plans => self.plans().list().await.map(Page::from_items),
            Resource::Auth => Err(ApiError::InvalidUrl(
                "auth has no list endpoint".to_string(),
            )),
        }
    }
}

// ============================================================================
// Notices
// ============================================================================

/// A dismissible message about the last action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Success or error.
    pub tone: Tone,
    /// Message text.
    pub message: String,
    /// When the notice was raised.
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    /// Creates a success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    /// Creates a failure notice.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    /// Returns true for a failure notice.
    pub fn is_failure(&self) -> bool {
        self.tone == Tone::Error
    }
}

// ============================================================================
// View State
// ============================================================================

struct ViewState {
    query: ListQuery,
    shown: Option<Shown>,
    in_flight: usize,
    load_seq: u64,
    notice: Option<Notice>,
}

/// The page currently on screen and the query that produced it.
struct Shown {
    query: ListQuery,
    data: Arc<QueryData>,
}

impl Shown {
    fn page(&self) -> Option<&Page> {
        self.data.as_page()
    }
}

// ============================================================================
// List View
// ============================================================================

/// Cached list view for one resource.
pub struct ListView<S> {
    source: Arc<S>,
    cache: SharedCache,
    state: RwLock<ViewState>,
}

impl<S: ListSource> ListView<S> {
    /// Creates a view starting at `query`. Nothing is fetched until
    /// [`ListView::load`]. Views of unpaginated resources always sit on
    /// page 1.
    ///
    /// # Errors
    ///
    /// Returns error if the query names an unlisted resource or a zero page
    /// or size.
    pub fn new(source: Arc<S>, cache: SharedCache, query: ListQuery) -> Result<Self, StoreError> {
        query.validate()?;
        let query = if query.resource.is_paginated() {
            query
        } else {
            query.page(1)
        };
        Ok(Self {
            source,
            cache,
            state: RwLock::new(ViewState {
                query,
                shown: None,
                in_flight: 0,
                load_seq: 0,
                notice: None,
            }),
        })
    }

    /// Returns the resource this view lists.
    pub async fn resource(&self) -> Resource {
        self.state.read().await.query.resource
    }

    /// Returns the requested query.
    pub async fn query(&self) -> ListQuery {
        self.state.read().await.query.clone()
    }

    /// Returns the cache key of the requested query.
    pub async fn key(&self) -> QueryKey {
        self.state.read().await.query.key()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Reads the requested page through the cache.
    ///
    /// The previously shown page stays visible until this resolves. Only the
    /// most recently started load updates what is shown. A failure raises a
    /// notice and leaves the shown page alone.
    ///
    /// # Errors
    ///
    /// Returns the backend error of a failed fetch.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Page, StoreError> {
        let (query, seq) = {
            let mut state = self.state.write().await;
            state.in_flight += 1;
            state.load_seq += 1;
            (state.query.clone(), state.load_seq)
        };
        let key = query.key();
        let loaded = query.clone();
        debug!(key = %key, "Loading list");

        let source = Arc::clone(&self.source);
        let result = self
            .cache
            .fetch(&key, || async move {
                source.list(&query).await.map(QueryData::Page)
            })
            .await;

        let mut state = self.state.write().await;
        state.in_flight -= 1;
        let latest = state.load_seq == seq;

        match result {
            Ok(data) => {
                let page = data.as_page().cloned().ok_or_else(|| {
                    StoreError::Core(CoreError::InvalidData(format!(
                        "cache entry {key} does not hold a page"
                    )))
                })?;
                if latest {
                    state.shown = Some(Shown {
                        query: loaded,
                        data,
                    });
                }
                Ok(page)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "List load failed");
                if latest {
                    state.notice = Some(Notice::failure(e.notice_text()));
                }
                Err(e.into())
            }
        }
    }

    /// Returns true while a load is in flight.
    pub async fn is_fetching(&self) -> bool {
        self.state.read().await.in_flight > 0
    }

    /// Returns true if the shown page belongs to an older query or the cache
    /// marked it stale.
    pub async fn is_stale(&self) -> bool {
        let (key, shown_key) = {
            let state = self.state.read().await;
            (state.query.key(), state.shown.as_ref().map(|s| s.query.key()))
        };
        if shown_key.as_ref() != Some(&key) {
            return true;
        }
        self.cache.peek(&key).await.is_none_or(|v| v.stale)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Moves to `page`, clamped into `[1, max(page_count, 1)]`, and loads it.
    ///
    /// The page count comes from the last shown page, so right after a
    /// filter change the clamp still uses the previous filter's total.
    ///
    /// # Errors
    ///
    /// Returns the backend error of a failed fetch.
    pub async fn set_page(&self, page: u32) -> Result<Page, StoreError> {
        {
            let mut state = self.state.write().await;
            let last = page_count_of(&state).max(1);
            state.query.page = page.clamp(1, last);
        }
        self.load().await
    }

    /// Moves to the next page if there is one.
    ///
    /// # Errors
    ///
    /// Returns the backend error of a failed fetch.
    pub async fn next_page(&self) -> Result<bool, StoreError> {
        if !self.has_next().await {
            return Ok(false);
        }
        let page = self.state.read().await.query.page;
        self.set_page(page + 1).await?;
        Ok(true)
    }

    /// Moves to the previous page if there is one.
    ///
    /// # Errors
    ///
    /// Returns the backend error of a failed fetch.
    pub async fn previous_page(&self) -> Result<bool, StoreError> {
        if !self.has_previous().await {
            return Ok(false);
        }
        let page = self.state.read().await.query.page;
        self.set_page(page - 1).await?;
        Ok(true)
    }

    /// Returns true if a previous page exists.
    pub async fn has_previous(&self) -> bool {
        self.state.read().await.query.page > 1
    }

    /// Returns true if a next page exists.
    pub async fn has_next(&self) -> bool {
        let state = self.state.read().await;
        state.query.page < page_count_of(&state)
    }

    /// Sets the status filter and returns to page 1. Does not load.
    ///
    /// [`ListView::page_count`] keeps reporting the previous total until the
    /// next load.
    pub async fn set_status(&self, status: Option<String>) {
        let mut state = self.state.write().await;
        state.query = state.query.clone().status(status).page(1);
    }

    /// Sets the search text and returns to page 1. Does not load.
    ///
    /// As with [`ListView::set_status`], the page count is the previous
    /// total until the next load.
    pub async fn set_search(&self, search: Option<String>) {
        let mut state = self.state.write().await;
        state.query = state.query.clone().search(search).page(1);
    }

    // ========================================================================
    // Shown Data
    // ========================================================================

    /// Returns the records of the shown page.
    pub async fn rows(&self) -> Vec<Record> {
        let state = self.state.read().await;
        state
            .shown
            .as_ref()
            .and_then(Shown::page)
            .map(|p| p.items.clone())
            .unwrap_or_default()
    }

    /// Returns the shown records matching the search text (case-insensitive).
    ///
    /// The backend has no search parameter, so the filter applies to the
    /// current page only.
    pub async fn visible_rows(&self) -> Vec<Record> {
        let state = self.state.read().await;
        let Some(page) = state.shown.as_ref().and_then(Shown::page) else {
            return Vec::new();
        };
        match state.query.search.as_deref() {
            Some(needle) => page
                .items
                .iter()
                .filter(|r| r.matches_search(needle))
                .cloned()
                .collect(),
            None => page.items.clone(),
        }
    }

    /// Returns the total number of records, as of the shown page.
    pub async fn total(&self) -> u64 {
        let state = self.state.read().await;
        state.shown.as_ref().and_then(Shown::page).map_or(0, |p| p.total)
    }

    /// Returns `ceil(total / page_size)`, or at most 1 for an unpaginated
    /// resource.
    pub async fn page_count(&self) -> u32 {
        page_count_of(&*self.state.read().await)
    }

    /// Returns `(first, last, total)` for "Showing x to y of n results".
    ///
    /// All zero when nothing is shown or the shown page is empty.
    pub async fn showing_range(&self) -> (u64, u64, u64) {
        let state = self.state.read().await;
        let Some(shown) = state.shown.as_ref() else {
            return (0, 0, 0);
        };
        let Some(page) = shown.page() else {
            return (0, 0, 0);
        };
        if page.items.is_empty() {
            return (0, 0, page.total);
        }
        if !shown.query.resource.is_paginated() {
            return (1, page.items.len() as u64, page.total);
        }
        let size = u64::from(shown.query.size);
        let first = u64::from(shown.query.page - 1) * size + 1;
        let last = (first + page.items.len() as u64 - 1).min(page.total.max(first));
        (first, last, page.total)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Runs a mutation against the backend.
    ///
    /// On success every cache entry of this view's resource is invalidated
    /// (any page or filter, including non-list keys) and a success notice is
    /// raised. On failure the cache is left untouched and a failure notice
    /// carries the error detail. The view does not reload by itself.
    ///
    /// # Errors
    ///
    /// Returns the backend error of a failed mutation.
    pub async fn mutate<F, Fut, T>(
        &self,
        success: &str,
        failure: &str,
        action: F,
    ) -> Result<T, StoreError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, ApiError>> + Send,
        T: Send,
    {
        let resource = self.resource().await;
        match action().await {
            Ok(value) => {
                let count = self.cache.invalidate_resource(resource).await;
                debug!(resource = %resource, invalidated = count, "Mutation succeeded");
                self.state.write().await.notice = Some(Notice::success(success));
                Ok(value)
            }
            Err(e) => {
                warn!(resource = %resource, error = %e, "Mutation failed");
                self.state.write().await.notice =
                    Some(Notice::failure(format!("{failure}: {}", e.notice_text())));
                Err(e.into())
            }
        }
    }

    /// Returns the current notice.
    pub async fn notice(&self) -> Option<Notice> {
        self.state.read().await.notice.clone()
    }

    /// Dismisses the current notice.
    pub async fn dismiss_notice(&self) {
        self.state.write().await.notice = None;
    }
}

fn page_count_of(state: &ViewState) -> u32 {
    let total = state
        .shown
        .as_ref()
        .and_then(Shown::page)
        .map_or(0, |p| p.total);
    if !state.query.resource.is_paginated() {
        return u32::from(total > 0);
    }
    page_count(total, state.query.size)
}

// ============================================================================
// Tests
// ============================================================================
