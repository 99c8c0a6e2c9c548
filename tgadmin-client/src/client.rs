//! Authenticated HTTP client for the admin REST API.

use reqwest::{Client, Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tgadmin_core::Route;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::navigation::{Navigator, RouteTracker};
use crate::session::Session;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("tgadmin/", env!("CARGO_PKG_VERSION"));

/// Longest raw (non-JSON) error body kept as detail text.
const MAX_RAW_DETAIL_CHARS: usize = 200;

// ============================================================================
// Response
// ============================================================================

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
}

impl ApiResponse {
    /// Decodes the body. An empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let text = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client core.
///
/// Attaches the session's bearer token to every request and applies the
/// global 401 policy: the session is cleared and the navigator is sent to
/// [`Route::Login`] before the error is returned.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    base: Url,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client with an in-memory session.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let inner = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner,
            base: config.api_root_url()?,
            session: Arc::new(Session::in_memory()),
            navigator: Arc::new(RouteTracker::default()),
        })
    }

    /// Replaces the session.
    #[must_use]
    pub fn with_session(mut self, session: Arc<Session>) -> Self {
        self.session = session;
        self
    }

    /// Replaces the navigator.
    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Returns the session.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Returns the navigator.
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Returns the API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds a URL under the API root.
    ///
    /// An empty trailing segment produces a trailing slash (`["users", ""]`
    /// gives `/api/v1/users/`).
    pub fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Sends a request and returns the successful response.
    #[instrument(skip(self, query, body), fields(path = %segments.join("/")))]
    pub async fn request<B>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(segments, query)?;
        debug!(method = %method, url = %url, "Sending request");

        let mut req = self
            .inner
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");

        if let Some(token) = self.session.token().await {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "Response received");

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized().await;
            return Err(ApiError::Unauthorized {
                detail: extract_detail(&text),
            });
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: extract_detail(&text),
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body: text,
        })
    }

    async fn handle_unauthorized(&self) {
        warn!("Backend rejected the session, signing out");
        if let Err(e) = self.session.clear().await {
            warn!(error = %e, "Failed to remove stored session token");
        }
        self.navigator.navigate(Route::Login);
    }

    /// Sends a request without a body and decodes the response.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request::<()>(method, segments, query, None)
            .await?
            .json()
    }

    /// `GET` and decode.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.send_json(Method::GET, segments, query).await
    }

    /// `POST` with an optional JSON body and decode.
    pub async fn post_json<B, T>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.request(Method::POST, segments, query, body)
            .await?
            .json()
    }

    /// `PUT` a JSON body and decode.
    pub async fn put_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, segments, &[], Some(body))
            .await?
            .json()
    }

    /// `DELETE` and decode.
    pub async fn delete_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.send_json(Method::DELETE, segments, &[]).await
    }
}

/// Extracts the error detail from a response body.
///
/// FastAPI-style bodies carry `{"detail": ...}`; a structured detail is kept
/// as compact JSON. Non-JSON bodies are kept as (truncated) text.
fn extract_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => Some(serde_json::Value::Object(map).to_string()),
        },
        Ok(other) => Some(other.to_string()),
        Err(_) => Some(body.chars().take(MAX_RAW_DETAIL_CHARS).collect()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&ClientConfig::new("http://localhost:8000")).unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = client();
        assert_eq!(
            client.url(&["bots", "all"], &[]).unwrap().as_str(),
            "http://localhost:8000/api/v1/bots/all"
        );
        assert_eq!(
            client
                .url(&["users", ""], &[("page", "2".into()), ("size", "10".into())])
                .unwrap()
                .as_str(),
            "http://localhost:8000/api/v1/users/?page=2&size=10"
        );
    }

    #[test]
    fn test_url_encodes_query_values() {
        let url = client()
            .url(
                &["payments", "7", "reject"],
                &[("reason", "insufficient proof".into())],
            )
            .unwrap();
        assert_eq!(url.query(), Some("reason=insufficient+proof"));
    }

    #[test]
    fn test_extract_detail() {
        assert_eq!(
            extract_detail(r#"{"detail":"Bot not found"}"#).as_deref(),
            Some("Bot not found")
        );
        assert_eq!(
            extract_detail(r#"{"detail":[{"loc":["query","days"],"msg":"bad"}]}"#).as_deref(),
            Some(r#"[{"loc":["query","days"],"msg":"bad"}]"#)
        );
        assert_eq!(
            extract_detail("Internal Server Error").as_deref(),
            Some("Internal Server Error")
        );
        assert_eq!(extract_detail("  "), None);
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let response = ApiResponse {
            status: 204,
            body: String::new(),
        };
        let value: serde_json::Value = response.json().unwrap();
        assert!(value.is_null());

        let response = ApiResponse {
            status: 200,
            body: "not json".into(),
        };
        assert!(matches!(
            response.json::<serde_json::Value>(),
            Err(ApiError::InvalidResponse(_))
        ));
    }
}
