// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # tgadmin Client
//!
//! Authenticated REST client for the Telegram bot SaaS admin API.
//!
//! ## HTTP Client Core
//!
//! [`ApiClient`] attaches the session's bearer token to every request and
//! applies the global 401 policy (clear the session, navigate to login).
//!
//! - [`session`] - [`Session`] and the [`TokenStore`] backends
//! - [`navigation`] - [`Navigator`] hook and [`RouteTracker`]
//! - [`config`] - Base URL and timeout resolution
//!
//! ## Endpoint Groups
//!
//! The [`api`] module maps each resource onto its REST paths:
//! `client.auth()`, `client.users()`, `client.bots()`,
//! `client.subscriptions()`, `client.payments()`, `client.plans()`.
//!
//! ## Example
//!
//! ```no_run
//! use tgadmin_client::{ApiClient, ClientConfig};
//! use tgadmin_core::LoginRequest;
//!
//! # async fn demo() -> Result<(), tgadmin_client::ApiError> {
//! let client = ApiClient::new(&ClientConfig::resolve(None, None))?;
//! client.auth().login(&LoginRequest::new(123_456_789)).await?;
//!
//! let pending = client.payments().pending().await?;
//! println!("{} payments awaiting review", pending.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod navigation;
pub mod session;

// Re-export key types at crate root

pub use api::{AuthApi, BotsApi, PaymentsApi, PlansApi, SubscriptionsApi, UsersApi};
pub use client::{ApiClient, ApiResponse};
pub use config::{API_URL_ENV, ClientConfig, DEFAULT_API_URL};
pub use error::{ApiError, ErrorKind, SessionError};
pub use navigation::{Navigator, RouteTracker};
pub use session::{KeyringTokenStore, MemoryTokenStore, Session, TokenStore};
