//! Navigation hook used by the 401 policy.

use tgadmin_core::Route;
use tokio::sync::watch;
use tracing::debug;

/// Receives navigation requests from the client.
pub trait Navigator: Send + Sync {
    /// Navigates to a route.
    fn navigate(&self, route: Route);
}

/// Navigator that records the current route in a watch channel.
#[derive(Debug)]
pub struct RouteTracker {
    current: watch::Sender<Route>,
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new(Route::default())
    }
}

impl RouteTracker {
    /// Creates a tracker starting at a route.
    pub fn new(initial: Route) -> Self {
        let (current, _) = watch::channel(initial);
        Self { current }
    }

    /// Returns the current route.
    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    /// Subscribes to route changes.
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Navigator for RouteTracker {
    fn navigate(&self, route: Route) {
        debug!(route = %route, "Navigating");
        self.current.send_replace(route);
    }
}
