//! Domain models for tgadmin.
//!
//! ## Submodules
//!
//! - [`resource`] - Resource names, list queries, cache keys and pagination
//! - [`record`] - Opaque records, pages and login tokens
//! - [`status`] - Display-only status vocabularies
//! - [`patch`] - Login, update and creation bodies
//! - [`route`] - Navigation targets

mod patch;
mod record;
mod resource;
mod route;
mod status;

pub use patch::{LoginRequest, NewPlan, PaymentPatch, PlanPatch, SubscriptionPatch, UserPatch};
pub use record::{Page, Record, TokenResponse, parse_timestamp, records_from_value};
pub use resource::{DEFAULT_PAGE_SIZE, ListQuery, QueryKey, Resource, page_count};
pub use route::Route;
pub use status::{BotStatus, PaymentStatus, SubscriptionStatus, Tone, status_tone};
#[cfg(test)]
mod serde_tests;
