//! CLI command implementations.

pub mod auth;
pub mod bots;
pub mod config;
pub mod dashboard;
pub mod payments;
pub mod plans;
pub mod subscriptions;
pub mod users;
pub mod watch;

mod list;
