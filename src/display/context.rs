//! Shared handles between a display session and its render loop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Notify;

use super::task::PanelTask;

/// Handle to a running display: task list plus refresh requests.
///
/// Cheap to clone; every clone talks to the same render loop.
#[derive(Clone, Default)]
pub struct LiveContext {
    inner: Arc<ContextInner>,
}

#[derive(Default)]
struct ContextInner {
    tasks: RwLock<Vec<Arc<PanelTask>>>,
    next_id: AtomicUsize,
    refresh: Notify,
}

impl LiveContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task and return a handle to it.
    pub fn add_task(&self, description: impl Into<String>) -> Arc<PanelTask> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let task = Arc::new(PanelTask::new(id, description.into()));
        self.inner.tasks.write().push(Arc::clone(&task));
        task
    }

    /// Snapshot of the registered tasks, in insertion order.
    pub fn tasks(&self) -> Vec<Arc<PanelTask>> {
        self.inner.tasks.read().clone()
    }

    /// Ask the render loop for a pass now instead of at the next tick.
    ///
    /// Requests made while the loop is busy coalesce into one pass.
    pub fn refresh(&self) {
        self.inner.refresh.notify_one();
    }

    /// Resolves when a refresh has been requested.
    pub(crate) async fn refresh_requested(&self) {
        self.inner.refresh.notified().await;
    }
}

/// What a renderer knows about the sink during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// Sink width in columns.
    pub width: u16,
    /// True when drawing in place, false when appending.
    pub live: bool,
}
