// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # tgadmin Store
//!
//! Client-side state for the tgadmin console.
//!
//! This crate provides:
//!
//! - **QueryCache**: Keyed response cache with invalidation and change notify
//! - **ListView**: Paginated, filterable list state reading through the cache
//! - **Dashboard**: Concurrent summary panels
//! - **SettingsStore**: User preferences with persistence
//! - **FileTokenStore**: Session token kept in a private file
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tgadmin_core::{ListQuery, Resource};
//! use tgadmin_store::{ListView, QueryCache};
//!
//! let cache = Arc::new(QueryCache::new());
//! let view = ListView::new(Arc::new(client), cache.clone(), ListQuery::new(Resource::Bots))?;
//! let page = view.load().await?;
//!
//! view.mutate("Bot started", "Failed to start bot", || client.bots().start("b1")).await?;
//! let page = view.load().await?; // refetched
//! ```

pub mod cache;
pub mod dashboard;
pub mod error;
pub mod list_view;
pub mod persistence;
pub mod session_file;
pub mod settings_store;

pub use cache::{CacheEntryView, DEFAULT_RETENTION, QueryCache, QueryData, SharedCache};
pub use dashboard::{Dashboard, DashboardSource, DashboardSummary, Panel};
pub use error::StoreError;
pub use list_view::{ListSource, ListView, Notice};
pub use persistence::{
    default_config_dir, default_session_path, default_settings_path, load_json,
    load_json_or_default, save_json,
};
pub use session_file::FileTokenStore;
pub use settings_store::{
    DEFAULT_EXPIRING_DAYS, LogLevel, SessionBackend, Settings, SettingsStore,
};
