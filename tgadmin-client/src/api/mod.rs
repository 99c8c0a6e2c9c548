//! Resource endpoint groups.
//!
//! Each group borrows an [`ApiClient`] and maps typed parameters onto a
//! path, query and body. Groups add no validation of their own.
//!
//! ```no_run
//! # async fn demo(client: &tgadmin_client::ApiClient) -> Result<(), tgadmin_client::ApiError> {
//! let page = client.bots().list(1, 10).await?;
//! client.bots().start("bot-1").await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod bots;
mod payments;
mod plans;
mod subscriptions;
mod users;

pub use auth::AuthApi;
pub use bots::BotsApi;
pub use payments::PaymentsApi;
pub use plans::PlansApi;
pub use subscriptions::SubscriptionsApi;
pub use users::UsersApi;

use serde_json::Value;
use tgadmin_core::{Record, records_from_value};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Query pairs for a paginated list.
pub(crate) fn page_query(page: u32, size: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("size", size.to_string())]
}

/// Decodes a record list that may arrive bare or inside an envelope object.
pub(crate) fn record_list(value: Value) -> Result<Vec<Record>, ApiError> {
    records_from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

impl ApiClient {
    /// Authentication endpoints.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// User endpoints.
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Bot instance endpoints.
    pub fn bots(&self) -> BotsApi<'_> {
        BotsApi::new(self)
    }

    /// Subscription endpoints.
    pub fn subscriptions(&self) -> SubscriptionsApi<'_> {
        SubscriptionsApi::new(self)
    }

    /// Payment endpoints.
    pub fn payments(&self) -> PaymentsApi<'_> {
        PaymentsApi::new(self)
    }

    /// Subscription plan endpoints.
    pub fn plans(&self) -> PlansApi<'_> {
        PlansApi::new(self)
    }
}
