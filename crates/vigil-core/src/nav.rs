//! Navigation action
//!
//! After an acknowledged logout the browser is sent to a login route. The
//! action is behind a trait so tests can record it and embedders can wire
//! their own router.

use tracing::info;

/// Redirect the user to a named route
pub trait Navigator: Send + Sync {
    /// Navigate to the given route
    fn navigate(&self, route: &str);
}

/// Navigator that only logs the requested route
#[derive(Debug, Default)]
pub struct LogNavigator;

impl LogNavigator {
    /// Create a logging navigator
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        info!(route = %route, "navigation requested");
    }
}
