//! Application state for the web layer.

use std::sync::Arc;

use crate::directory::StopResolver;
use crate::domain::Clock;
use crate::fetch::ArrivalClient;
use crate::refresh::RefreshSchedule;

/// Shared application state.
///
/// Generic over the markup source so the router can be driven by an
/// in-memory source in tests.
pub struct AppState<S = ArrivalClient> {
    /// Station directories, loaded once at startup
    pub resolver: Arc<StopResolver>,

    /// Where status pages come from
    pub source: Arc<S>,

    /// Source of "now" for countdowns
    pub clock: Clock,

    /// Live board refresh period
    pub refresh: RefreshSchedule,
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(resolver: StopResolver, source: S, clock: Clock, refresh: RefreshSchedule) -> Self {
        Self {
            resolver: Arc::new(resolver),
            source: Arc::new(source),
            clock,
            refresh,
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
            source: Arc::clone(&self.source),
            clock: self.clock,
            refresh: self.refresh,
        }
    }
}
