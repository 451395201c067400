use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc::{self, error::TrySendError};

use figma_core::error::Error;
use figma_core::types::SessionId;
use figma_mcp::{Dispatcher, JsonRpcRequest, JsonRpcResponse};

use crate::rpc;

const INBOUND_CAPACITY: usize = 32;
const OUTBOUND_CAPACITY: usize = 32;

/// Inbound half of an SSE session: the queue its worker drains.
#[derive(Debug, Clone)]
pub struct SessionTransport {
    inbound: mpsc::Sender<JsonRpcRequest>,
}

impl SessionTransport {
    #[must_use]
    pub fn new(inbound: mpsc::Sender<JsonRpcRequest>) -> Self {
        Self { inbound }
    }

    /// Queue a posted message for the session's worker without waiting.
    ///
    /// The queue only fills up when the client stops reading its SSE stream,
    /// so a full queue is reported instead of stalling the POST.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Busy`] when the queue is full and
    /// [`DeliveryError::Closed`] once the worker has shut down.
    pub fn deliver(&self, req: JsonRpcRequest) -> Result<(), DeliveryError> {
        self.inbound.try_send(req).map_err(|err| match err {
            TrySendError::Full(_) => DeliveryError::Busy,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

/// Why a posted message could not be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("session queue is full")]
    Busy,
    #[error("session is closed")]
    Closed,
}

impl PartialEq for SessionTransport {
    fn eq(&self, other: &Self) -> bool {
        self.inbound.same_channel(&other.inbound)
    }
}

/// A freshly opened session, handed to the SSE handler.
pub struct OpenSession {
    pub id: SessionId,
    /// Responses for this session, in the order requests were received.
    pub outbound: mpsc::Receiver<JsonRpcResponse>,
    /// Unregisters the session when dropped.
    pub guard: SessionGuard,
}

/// Maps session ids to the transports of live SSE connections.
pub struct SessionRouter {
    sessions: RwLock<HashMap<SessionId, SessionTransport>>,
}

impl SessionRouter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, id: SessionId, transport: SessionTransport) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(id, transport);
    }

    /// Find the transport for a session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if no live session has this id.
    pub fn lookup(&self, id: &SessionId) -> Result<SessionTransport, Error> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(id)
            .cloned()
            .ok_or(Error::SessionNotFound(*id))
    }

    /// Remove a session. Returns true if it was registered.
    pub fn unregister(&self, id: &SessionId) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a new session served by `dispatcher`.
    ///
    /// Spawns the session's worker, which answers requests one at a time so
    /// responses keep the order of the requests. The worker exits once the
    /// session is unregistered and its queue is drained.
    pub fn open(self: &Arc<Self>, dispatcher: Dispatcher) -> OpenSession {
        let id = SessionId::new();
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CAPACITY);

        tokio::spawn(run_session(id, dispatcher, inbound_rx, outbound_tx));
        self.register(id, SessionTransport::new(inbound_tx));
        tracing::info!(session_id = %id, active = self.len(), "Session opened");

        OpenSession {
            id,
            outbound: outbound_rx,
            guard: SessionGuard {
                id,
                router: Arc::clone(self),
            },
        }
    }
}

impl Default for SessionRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Unregisters its session on drop, i.e. when the SSE stream goes away.
pub struct SessionGuard {
    id: SessionId,
    router: Arc<SessionRouter>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.router.unregister(&self.id) {
            tracing::info!(session_id = %self.id, active = self.router.len(), "Session closed");
        }
    }
}

async fn run_session(
    id: SessionId,
    dispatcher: Dispatcher,
    mut inbound: mpsc::Receiver<JsonRpcRequest>,
    outbound: mpsc::Sender<JsonRpcResponse>,
) {
    while let Some(req) = inbound.recv().await {
        let Some(response) = rpc::handle(&dispatcher, req).await else {
            continue;
        };
        if outbound.send(response).await.is_err() {
            tracing::debug!(session_id = %id, "Connection closed, dropping response");
            break;
        }
    }
    tracing::debug!(session_id = %id, "Session worker stopped");
}
