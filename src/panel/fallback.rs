//! Fallback renderer for sinks that cannot redraw in place.
//!
//! Emits one block per distinct state it observes, in observation order.
//! An unchanged state emits nothing. States overwritten between two passes
//! are never seen.

use std::time::Duration;

use parking_lot::Mutex;
use ratatui::text::Text;
use tracing::trace;

use crate::display::{LiveContext, RenderContext, Renderer};
use crate::error::{PanelError, PanelResult};

use super::{PanelState, RenderFn};

pub struct FallbackPanelRenderer<T> {
    key: &'static str,
    render: RenderFn<T>,
    inner: Mutex<Emission<T>>,
}

struct Emission<T> {
    /// Starts at `T::default()`, so the seeded state is never emitted.
    last_emitted: T,
    /// At most one block waiting for `process`.
    pending: Option<Text<'static>>,
}

impl<T: PanelState> FallbackPanelRenderer<T> {
    pub fn new(render: RenderFn<T>, key: &'static str) -> Self {
        Self {
            key,
            render,
            inner: Mutex::new(Emission {
                last_emitted: T::default(),
                pending: None,
            }),
        }
    }
}

impl<T: PanelState> Renderer for FallbackPanelRenderer<T> {
    fn min_refresh_interval(&self) -> Duration {
        Duration::ZERO
    }

    fn update(&self, ctx: &LiveContext, _render: &RenderContext) -> PanelResult<()> {
        let mut inner = self.inner.lock();
        let tasks = ctx.tasks();
        let task = match tasks.as_slice() {
            [] => {
                inner.pending = None;
                return Ok(());
            }
            [task] => task,
            many => {
                inner.pending = None;
                return Err(PanelError::MultipleTasks(many.len()));
            }
        };

        let state: T = task.state().get(self.key)?;
        if state != inner.last_emitted {
            trace!(task = task.id(), "panel state changed");
            inner.last_emitted = state;
            let block = (self.render)(&inner.last_emitted);
            inner.pending = Some(block);
            return Ok(());
        }

        inner.pending = None;
        Ok(())
    }

    fn process(
        &self,
        _render: &RenderContext,
        mut renderables: Vec<Text<'static>>,
    ) -> Vec<Text<'static>> {
        let mut inner = self.inner.lock();
        if let Some(block) = inner.pending.take() {
            renderables.push(block);
        }
        renderables
    }
}
