//! User endpoints.

use serde::Serialize;
use serde_json::Value;
use tgadmin_core::{Page, Record};

use super::page_query;
use crate::client::ApiClient;
use crate::error::ApiError;

/// `/users` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /users/?page&size`
    pub async fn list(&self, page: u32, size: u32) -> Result<Page, ApiError> {
        self.client
            .get_json(&["users", ""], &page_query(page, size))
            .await
    }

    /// `GET /users/{id}`
    pub async fn get(&self, id: &str) -> Result<Record, ApiError> {
        self.client.get_json(&["users", id], &[]).await
    }

    /// `PUT /users/{id}`
    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<Record, ApiError>
    where
        P: Serialize + ?Sized + Sync,
    {
        self.client.put_json(&["users", id], patch).await
    }

    /// `DELETE /users/{id}`
    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.client.delete_json(&["users", id]).await
    }
}
