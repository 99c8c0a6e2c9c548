//! Subscription endpoints.

use serde::Serialize;
use serde_json::Value;
use tgadmin_core::{Page, Record};

use super::{page_query, record_list};
use crate::client::ApiClient;
use crate::error::ApiError;

/// `/subscriptions` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SubscriptionsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /subscriptions/all?page&size`
    pub async fn list(&self, page: u32, size: u32) -> Result<Page, ApiError> {
        self.client
            .get_json(&["subscriptions", "all"], &page_query(page, size))
            .await
    }

    /// `GET /subscriptions/{id}`
    pub async fn get(&self, id: &str) -> Result<Record, ApiError> {
        self.client.get_json(&["subscriptions", id], &[]).await
    }

    /// `PUT /subscriptions/{id}`
    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<Record, ApiError>
    where
        P: Serialize + ?Sized + Sync,
    {
        self.client.put_json(&["subscriptions", id], patch).await
    }

    /// Extends a subscription. `POST /subscriptions/{id}/extend?days=`
    pub async fn extend(&self, id: &str, days: u32) -> Result<Value, ApiError> {
        self.client
            .post_json::<(), _>(
                &["subscriptions", id, "extend"],
                &[("days", days.to_string())],
                None,
            )
            .await
    }

    /// Subscriptions expiring within `days`.
    /// `GET /subscriptions/expiring/reminders?days=`
    ///
    /// The backend wraps the list as `{"expiring_subscriptions": [...], "count", "days"}`.
    pub async fn expiring(&self, days: u32) -> Result<Vec<Record>, ApiError> {
        let body: Value = self
            .client
            .get_json(
                &["subscriptions", "expiring", "reminders"],
                &[("days", days.to_string())],
            )
            .await?;
        record_list(body)
    }

    /// `GET /subscriptions/expired/list`
    pub async fn expired(&self) -> Result<Vec<Record>, ApiError> {
        let body: Value = self
            .client
            .get_json(&["subscriptions", "expired", "list"], &[])
            .await?;
        record_list(body)
    }
}
