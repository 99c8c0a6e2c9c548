//! Payment endpoints.

use serde::Serialize;
use serde_json::Value;
use tgadmin_core::{Page, Record};

use super::page_query;
use crate::client::ApiClient;
use crate::error::ApiError;

/// `/payments` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PaymentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /payments/all?page&size[&status_filter]`
    pub async fn list(&self, page: u32, size: u32, status: Option<&str>) -> Result<Page, ApiError> {
        let mut query = page_query(page, size);
        if let Some(status) = status.filter(|s| !s.is_empty()) {
            query.push(("status_filter", status.to_string()));
        }
        self.client.get_json(&["payments", "all"], &query).await
    }

    /// `GET /payments/{id}`
    pub async fn get(&self, id: &str) -> Result<Record, ApiError> {
        self.client.get_json(&["payments", id], &[]).await
    }

    /// `PUT /payments/{id}`
    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<Record, ApiError>
    where
        P: Serialize + ?Sized + Sync,
    {
        self.client.put_json(&["payments", id], patch).await
    }

    /// `POST /payments/{id}/confirm`
    pub async fn confirm(&self, id: &str) -> Result<Value, ApiError> {
        self.client
            .post_json::<(), _>(&["payments", id, "confirm"], &[], None)
            .await
    }

    /// `POST /payments/{id}/reject?reason=`
    pub async fn reject(&self, id: &str, reason: &str) -> Result<Value, ApiError> {
        self.client
            .post_json::<(), _>(
                &["payments", id, "reject"],
                &[("reason", reason.to_string())],
                None,
            )
            .await
    }

    /// Payments awaiting review. `GET /payments/pending`
    pub async fn pending(&self) -> Result<Vec<Record>, ApiError> {
        self.client.get_json(&["payments", "pending"], &[]).await
    }
}
