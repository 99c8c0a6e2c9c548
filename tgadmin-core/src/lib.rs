// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # tgadmin Core
//!
//! Core types shared by the tgadmin client, cache and console.
//!
//! ## Key Types
//!
//! ### Identity
//! - [`Resource`] - Backend resource groups
//! - [`ListQuery`] - Page, size and filters of a list read
//! - [`QueryKey`] - Deterministic cache key
//!
//! ### Payloads
//! - [`Record`] - Opaque resource record with typed accessors
//! - [`Page`] - One page of a paginated list
//! - [`TokenResponse`] - Login result
//!
//! ### Display
//! - [`BotStatus`], [`SubscriptionStatus`], [`PaymentStatus`] - Status vocabularies
//! - [`Tone`] - Badge tone for a status
//! - [`Route`] - Navigation targets

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    // Identity
    DEFAULT_PAGE_SIZE,
    ListQuery,
    QueryKey,
    Resource,
    page_count,
    // Payloads
    LoginRequest,
    NewPlan,
    Page,
    PaymentPatch,
    PlanPatch,
    Record,
    SubscriptionPatch,
    TokenResponse,
    UserPatch,
    parse_timestamp,
    records_from_value,
    // Display
    BotStatus,
    PaymentStatus,
    Route,
    SubscriptionStatus,
    Tone,
    status_tone,
};
