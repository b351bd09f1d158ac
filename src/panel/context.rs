//! Producer-side handle to a running update panel.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::display::{LiveContext, PanelTask};

use super::{PanelState, STATE_KEY};

/// Handed to the producer: read and publish state, request redraws.
///
/// `Send + Sync + Clone`, so it can move to blocking threads or be shared.
pub struct PanelContext<T> {
    display: LiveContext,
    task: Arc<PanelTask>,
    _state: PhantomData<fn() -> T>,
}

impl<T: PanelState> PanelContext<T> {
    pub(crate) fn new(display: LiveContext, task: Arc<PanelTask>) -> Self {
        Self {
            display,
            task,
            _state: PhantomData,
        }
    }

    /// The state most recently published.
    pub fn status(&self) -> T {
        // Only this type ever writes STATE_KEY, so the read cannot mismatch.
        self.task.state().get(STATE_KEY).unwrap_or_default()
    }

    /// Publish new state. Does not redraw by itself.
    pub fn set_status(&self, status: T) {
        self.task.state().set(STATE_KEY, status);
    }

    /// Ask for a render pass now rather than at the next tick.
    pub fn refresh(&self) {
        self.display.refresh();
    }
}

impl<T> Clone for PanelContext<T> {
    fn clone(&self) -> Self {
        Self {
            display: self.display.clone(),
            task: Arc::clone(&self.task),
            _state: PhantomData,
        }
    }
}
