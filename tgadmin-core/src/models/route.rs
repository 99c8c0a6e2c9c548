//! Navigation targets of the admin console.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A navigable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Login entry point.
    Login,
    /// Summary dashboard.
    #[default]
    Dashboard,
    /// Users list.
    Users,
    /// Bot instances list.
    Bots,
    /// Subscriptions list.
    Subscriptions,
    /// Payments list.
    Payments,
    /// Settings form.
    Settings,
}

impl Route {
    /// Returns the path of this route.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Users => "/users",
            Self::Bots => "/bots",
            Self::Subscriptions => "/subscriptions",
            Self::Payments => "/payments",
            Self::Settings => "/settings",
        }
    }

    /// Returns true if the route needs an authenticated session.
    pub fn requires_session(&self) -> bool {
        *self != Self::Login
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
