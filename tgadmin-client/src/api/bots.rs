//! Bot instance endpoints.

use serde_json::Value;
use tgadmin_core::{Page, Record};

use super::page_query;
use crate::client::ApiClient;
use crate::error::ApiError;

/// `/bots` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct BotsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BotsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /bots/all?page&size`
    pub async fn list(&self, page: u32, size: u32) -> Result<Page, ApiError> {
        self.client
            .get_json(&["bots", "all"], &page_query(page, size))
            .await
    }

    /// `GET /bots/{id}`
    pub async fn get(&self, id: &str) -> Result<Record, ApiError> {
        self.client.get_json(&["bots", id], &[]).await
    }

    /// `POST /bots/{id}/start`
    pub async fn start(&self, id: &str) -> Result<Value, ApiError> {
        self.action(id, "start").await
    }

    /// `POST /bots/{id}/stop`
    pub async fn stop(&self, id: &str) -> Result<Value, ApiError> {
        self.action(id, "stop").await
    }

    /// `POST /bots/{id}/restart`
    pub async fn restart(&self, id: &str) -> Result<Value, ApiError> {
        self.action(id, "restart").await
    }

    async fn action(&self, id: &str, action: &str) -> Result<Value, ApiError> {
        self.client
            .post_json::<(), _>(&["bots", id, action], &[], None)
            .await
    }
}
