//! Resource names, list queries and cache keys.
//!
//! This module contains the identity types shared by the client and the cache:
//! - [`Resource`] - Backend resource groups
//! - [`ListQuery`] - Parameters of a paginated list read
//! - [`QueryKey`] - Deterministic cache key derived from a resource and params
//! - [`page_count`] - `ceil(total / page_size)`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::CoreError;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// ============================================================================
// Resource
// ============================================================================

/// Backend resource groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Authentication and the current admin.
    Auth,
    /// Platform users.
    Users,
    /// Deployed bot instances.
    Bots,
    /// User subscriptions.
    Subscriptions,
    /// Subscription payments.
    Payments,
    /// Subscription plans.
    Plans,
}

impl Resource {
    /// Returns the cache/resource name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Users => "users",
            Self::Bots => "bots",
            Self::Subscriptions => "subscriptions",
            Self::Payments => "payments",
            Self::Plans => "plans",
        }
    }

    /// Returns the display name for this resource.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Auth => "Auth",
            Self::Users => "Users",
            Self::Bots => "Bots",
            Self::Subscriptions => "Subscriptions",
            Self::Payments => "Payments",
            Self::Plans => "Plans",
        }
    }

    /// Returns the resources that have a list view.
    pub fn listable() -> &'static [Resource] {
        &[
            Self::Users,
            Self::Bots,
            Self::Subscriptions,
            Self::Payments,
            Self::Plans,
        ]
    }

    /// Returns true if the backend paginates this resource's list.
    pub fn is_paginated(&self) -> bool {
        matches!(
            self,
            Self::Users | Self::Bots | Self::Subscriptions | Self::Payments
        )
    }

    /// Parses a resource from its name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "auth" => Some(Self::Auth),
            "users" | "user" => Some(Self::Users),
            "bots" | "bot" => Some(Self::Bots),
            "subscriptions" | "subscription" | "subs" => Some(Self::Subscriptions),
            "payments" | "payment" => Some(Self::Payments),
            "plans" | "plan" => Some(Self::Plans),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Query Key
// ============================================================================

/// Deterministic cache key: a resource plus an ordered set of parameters.
///
/// Parameters are kept in a `BTreeMap`, so two keys built from the same
/// parameters compare equal and hash identically regardless of insertion
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey {
    resource: Resource,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    /// Creates a key for a resource with no parameters.
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            params: BTreeMap::new(),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    /// Adds a parameter only when a value is present.
    #[must_use]
    pub fn with_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    /// Returns the resource this key belongs to.
    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Returns a parameter value.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns true if this key belongs to the given resource.
    pub fn matches_resource(&self, resource: Resource) -> bool {
        self.resource == resource
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource.as_str())?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

// ============================================================================
// List Query
// ============================================================================

/// Parameters of a paginated list read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListQuery {
    /// Resource being listed.
    pub resource: Resource,
    /// Page number, starting at 1.
    pub page: u32,
    /// Rows per page.
    pub size: u32,
    /// Optional status filter (payments only on the backend).
    pub status: Option<String>,
    /// Optional search text.
    pub search: Option<String>,
}

impl ListQuery {
    /// Creates a query for the first page of a resource.
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            status: None,
            search: None,
        }
    }

    /// Sets the page.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Sets the status filter. Empty strings clear it.
    #[must_use]
    pub fn status(mut self, status: Option<impl Into<String>>) -> Self {
        self.status = normalize(status.map(Into::into));
        self
    }

    /// Sets the search text. Empty strings clear it.
    #[must_use]
    pub fn search(mut self, search: Option<impl Into<String>>) -> Self {
        self.search = normalize(search.map(Into::into));
        self
    }

    /// Checks that the resource is listable and page/size are at least 1.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !Resource::listable().contains(&self.resource) {
            return Err(CoreError::InvalidQuery(format!(
                "{} has no list view",
                self.resource
            )));
        }
        if self.page == 0 {
            return Err(CoreError::InvalidQuery("page must be >= 1".to_string()));
        }
        if self.size == 0 {
            return Err(CoreError::InvalidQuery("size must be >= 1".to_string()));
        }
        Ok(())
    }

    /// Derives the cache key for this query.
    ///
    /// Page and size are left out for resources the backend does not
    /// paginate, since every page of those is the same list.
    pub fn key(&self) -> QueryKey {
        let key = QueryKey::new(self.resource).with("view", "list");
        let key = if self.resource.is_paginated() {
            key.with("page", self.page).with("size", self.size)
        } else {
            key
        };
        key.with_opt("status", self.status.as_deref())
            .with_opt("search", self.search.as_deref())
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Pagination
// ============================================================================

/// Computes `ceil(total / page_size)`. A zero page size yields zero pages.
pub fn page_count(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(key: &QueryKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(23, 10), 3);
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(30, 10), 3);
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 0), 0);
    }

    #[test]
    fn test_identical_queries_share_key() {
        let a = ListQuery::new(Resource::Payments)
            .page(2)
            .status(Some("pending"));
        let b = ListQuery::new(Resource::Payments)
            .status(Some("pending"))
            .page(2);

        assert_eq!(a.key(), b.key());
        assert_eq!(hash_of(&a.key()), hash_of(&b.key()));
    }

    #[test]
    fn test_params_change_key() {
        let base = ListQuery::new(Resource::Bots);
        assert_ne!(base.key(), base.clone().page(2).key());
        assert_ne!(base.key(), base.clone().size(20).key());
        assert_ne!(base.key(), base.clone().search(Some("alpha")).key());
        assert_ne!(
            base.key(),
            ListQuery::new(Resource::Users).key(),
            "different resources must not collide"
        );
    }

    #[test]
    fn test_unpaginated_key_ignores_page() {
        let first = ListQuery::new(Resource::Plans);
        let second = ListQuery::new(Resource::Plans).page(2).size(5);
        assert_eq!(first.key(), second.key());
        assert_eq!(first.key().param("page"), None);
        assert_eq!(first.key().to_string(), "plans?view=list");
    }

    #[test]
    fn test_empty_filters_are_ignored() {
        let a = ListQuery::new(Resource::Payments).status(Some(""));
        let b = ListQuery::new(Resource::Payments);
        assert_eq!(a.key(), b.key());
        assert!(a.status.is_none());
    }

    #[test]
    fn test_key_display_is_sorted() {
        let key = QueryKey::new(Resource::Payments)
            .with("size", 10)
            .with("page", 1);
        assert_eq!(key.to_string(), "payments?page=1&size=10");
    }

    #[test]
    fn test_validate() {
        assert!(ListQuery::new(Resource::Users).validate().is_ok());
        assert!(ListQuery::new(Resource::Users).page(0).validate().is_err());
        assert!(ListQuery::new(Resource::Users).size(0).validate().is_err());
        assert!(ListQuery::new(Resource::Auth).validate().is_err());
    }

    #[test]
    fn test_resource_from_name() {
        assert_eq!(Resource::from_name("Bots"), Some(Resource::Bots));
        assert_eq!(Resource::from_name("subs"), Some(Resource::Subscriptions));
        assert_eq!(Resource::from_name("nope"), None);
    }
}
