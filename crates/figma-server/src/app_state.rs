use std::sync::Arc;

use figma_core::traits::FigmaApiFactory;
use figma_mcp::Dispatcher;

use crate::config::Tenancy;
use crate::session::SessionRouter;

/// Shared application state with injected dependencies.
#[derive(Clone)]
pub struct AppState {
    pub api_factory: Arc<dyn FigmaApiFactory>,
    pub sessions: Arc<SessionRouter>,
    pub tenancy: Tenancy,
}

impl AppState {
    #[must_use]
    pub fn new(api_factory: Arc<dyn FigmaApiFactory>, tenancy: Tenancy) -> Self {
        Self {
            api_factory,
            sessions: Arc::new(SessionRouter::new()),
            tenancy,
        }
    }

    /// Build a dispatcher for a connection that supplied `token`.
    ///
    /// Returns `None` when no credential is available for it.
    pub fn dispatcher_for(&self, token: Option<&str>) -> Option<Dispatcher> {
        let credential = self.tenancy.resolve(token)?;
        Some(Dispatcher::new(self.api_factory.connect(credential)))
    }
}
