//! Authentication endpoints.

use tgadmin_core::{LoginRequest, Record, Route, TokenResponse};
use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::error::ApiError;

/// `/auth` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Logs in as an administrator and starts the session.
    ///
    /// `POST /auth/login/admin`. The returned token is stored only when the
    /// whole call succeeds.
    #[instrument(skip(self, request), fields(telegram_user_id = request.telegram_user_id))]
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        let token: TokenResponse = self
            .client
            .post_json(&["auth", "login", "admin"], &[], Some(request))
            .await?;

        self.client.session().begin(token.access_token.clone()).await?;
        info!("Logged in");
        Ok(token)
    }

    /// Returns the current administrator. `GET /auth/me`.
    pub async fn me(&self) -> Result<Record, ApiError> {
        self.client.get_json(&["auth", "me"], &[]).await
    }

    /// Ends the session locally and navigates to the login route.
    ///
    /// The backend has no logout endpoint; the token simply stops being sent.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.client.session().clear().await;
        self.client.navigator().navigate(Route::Login);
        result?;
        info!("Logged out");
        Ok(())
    }
}
