//! Subscription plan endpoints.

use serde::Serialize;
use serde_json::Value;
use tgadmin_core::Record;

use crate::client::ApiClient;
use crate::error::ApiError;

/// `/subscriptions/plans` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PlansApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PlansApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /subscriptions/plans`
    pub async fn list(&self) -> Result<Vec<Record>, ApiError> {
        self.client
            .get_json(&["subscriptions", "plans"], &[])
            .await
    }

    /// `POST /subscriptions/plans`
    pub async fn create<P>(&self, plan: &P) -> Result<Record, ApiError>
    where
        P: Serialize + ?Sized + Sync,
    {
        self.client
            .post_json(&["subscriptions", "plans"], &[], Some(plan))
            .await
    }

    /// `PUT /subscriptions/plans/{id}`
    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<Record, ApiError>
    where
        P: Serialize + ?Sized + Sync,
    {
        self.client
            .put_json(&["subscriptions", "plans", id], patch)
            .await
    }

    /// `DELETE /subscriptions/plans/{id}`
    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.client
            .delete_json(&["subscriptions", "plans", id])
            .await
    }
}
