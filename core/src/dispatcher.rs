//! Request dispatch and in-flight bookkeeping.
//!
//! # Design
//! `dispatch` builds the request, registers a `TaskHandle` *before* the
//! operation is spawned, and runs the executor on tokio's blocking pool.
//! The spawned task races the executor against the handle's cancel signal.
//! On completion it removes its own handle and only then delivers the
//! outcome; if the handle was already gone (cleared by `cancel`), nothing is
//! delivered. This gives the two lifecycle guarantees:
//!
//! - a non-cancelled request completes exactly once, and
//! - a handle is never registered after its outcome was delivered.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::builder::build_request;
use crate::endpoint::Endpoint;
use crate::error::{TransportError, TransportErrorKind};
use crate::executor::HttpExecutor;
use crate::http::RawOutcome;
use crate::logger::log_request;
use crate::registry::{TaskHandle, TaskId, TaskRegistry};

/// Submits requests to an executor and tracks them until completion.
pub struct Dispatcher<E> {
    registry: Arc<TaskRegistry>,
    executor: Arc<E>,
    runtime: Handle,
}

impl<E: HttpExecutor> Dispatcher<E> {
    pub fn new(executor: E, runtime: Handle) -> Self {
        Self::with_registry(executor, Arc::new(TaskRegistry::new()), runtime)
    }

    /// Create a dispatcher that records in-flight requests in `registry`.
    pub fn with_registry(executor: E, registry: Arc<TaskRegistry>, runtime: Handle) -> Self {
        Self {
            registry,
            executor: Arc::new(executor),
            runtime,
        }
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// Build and submit `endpoint`, calling `on_complete` with the outcome.
    ///
    /// A build failure invokes `on_complete` immediately on the calling
    /// thread and returns `None`; nothing is registered in that case.
    /// Otherwise the id of the registered task is returned and
    /// `on_complete` runs on the runtime once the request finishes, unless
    /// it is cancelled first.
    pub fn dispatch<F>(&self, endpoint: &Endpoint, log: bool, on_complete: F) -> Option<TaskId>
    where
        F: FnOnce(RawOutcome) + Send + 'static,
    {
        let request = match build_request(endpoint) {
            Ok(request) => request,
            Err(e) => {
                debug!(path = %endpoint.path, error = %e, "request build failed");
                on_complete(RawOutcome::failed(e));
                return None;
            }
        };
        if log {
            log_request(&request);
        }

        let (handle, signal) = TaskHandle::new();
        let id = handle.id();
        self.registry.append(handle);
        trace!(%id, method = %request.method, url = %request.url, "request registered");

        let registry = Arc::clone(&self.registry);
        let executor = Arc::clone(&self.executor);
        self.runtime.spawn(async move {
            let work = tokio::task::spawn_blocking(move || executor.execute(request));
            let outcome = tokio::select! {
                biased;
                _ = signal.cancelled() => {
                    trace!(%id, "request cancelled");
                    return;
                }
                joined = work => joined.unwrap_or_else(|e| {
                    RawOutcome::failed(TransportError::new(
                        TransportErrorKind::Unknown,
                        format!("executor failed: {e}"),
                    ))
                }),
            };

            let tracked = registry.remove(id);
            if outcome.error.as_ref().is_some_and(|e| e.is_cancelled()) {
                trace!(%id, "transport reported cancellation");
                return;
            }
            if !tracked {
                trace!(%id, "request cleared before completion");
                return;
            }
            on_complete(outcome);
        });

        Some(id)
    }

    /// Like [`dispatch`](Self::dispatch), delivering the outcome through a
    /// future instead of a callback.
    pub fn send(&self, endpoint: &Endpoint, log: bool) -> PendingRequest {
        let (tx, rx) = oneshot::channel();
        let id = self.dispatch(endpoint, log, move |outcome| {
            let _ = tx.send(outcome);
        });
        PendingRequest { id, rx }
    }

    /// Cancel every tracked request and clear the registry.
    ///
    /// Returns without waiting for the transport to stop; cancelled requests
    /// never deliver an outcome.
    pub fn cancel(&self) {
        self.registry.cancel_all();
        self.registry.remove_all();
    }

    pub fn is_requesting(&self) -> bool {
        !self.registry.is_empty()
    }
}

/// Outcome of a request submitted with [`Dispatcher::send`].
#[derive(Debug)]
pub struct PendingRequest {
    id: Option<TaskId>,
    rx: oneshot::Receiver<RawOutcome>,
}

impl PendingRequest {
    /// Registry id of the request, `None` if it failed to build.
    pub fn id(&self) -> Option<TaskId> {
        self.id
    }

    /// Wait for the outcome. Resolves to `None` if the request was cancelled.
    pub async fn outcome(self) -> Option<RawOutcome> {
        self.rx.await.ok()
    }
}
