//! Registry of in-flight requests.
//!
//! # Design
//! One `parking_lot::Mutex` guards the whole collection and is held for the
//! full duration of every operation, so no caller ever observes a
//! half-applied change. The guard releases on every exit path, panics
//! included. Cancelling a handle only fires a oneshot signal; nothing in
//! here waits for the underlying operation to stop.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Identity of one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Cancellable handle to one in-flight operation.
///
/// Handles compare by identity: two handles are equal only when they were
/// cloned from the same `TaskHandle::new` call.
#[derive(Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl TaskHandle {
    /// Create a handle and the signal its operation listens on.
    pub fn new() -> (Self, CancelSignal) {
        let (tx, rx) = oneshot::channel();
        let handle = Self {
            id: TaskId::new(),
            cancel_tx: Arc::new(Mutex::new(Some(tx))),
        };
        (handle, CancelSignal(rx))
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Signal cancellation. Returns `false` if already cancelled or the
    /// operation no longer listens.
    pub fn cancel(&self) -> bool {
        match self.cancel_tx.lock().take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_tx.lock().is_none()
    }
}

impl PartialEq for TaskHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TaskHandle {}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle").field("id", &self.id).finish()
    }
}

/// Receiving side of a `TaskHandle`.
///
/// Resolves once the handle is cancelled, or once every clone of the handle
/// is dropped, whichever comes first.
#[derive(Debug)]
pub struct CancelSignal(oneshot::Receiver<()>);

impl CancelSignal {
    pub async fn cancelled(self) {
        let _ = self.0.await;
    }
}

/// Mutex-guarded set of live task handles.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Mutex<Vec<TaskHandle>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, handle: TaskHandle) {
        self.tasks.lock().push(handle);
    }

    /// Remove the handle with identity `id`. Returns whether it was present.
    pub fn remove(&self, id: TaskId) -> bool {
        let mut tasks = self.tasks.lock();
        let before = tasks.len();
        tasks.retain(|h| h.id != id);
        tasks.len() != before
    }

    /// Signal cancellation to every member. Membership is left unchanged.
    pub fn cancel_all(&self) {
        for handle in self.tasks.lock().iter() {
            handle.cancel();
        }
    }

    pub fn remove_all(&self) {
        self.tasks.lock().clear();
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.lock().iter().any(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}
