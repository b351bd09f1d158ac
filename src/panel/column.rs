//! Column that renders the panel's state slot with a caller function.

use std::time::Duration;

use ratatui::text::Text;

use crate::display::{Column, PanelTask, RenderContext};
use crate::error::PanelResult;

use super::{PanelState, RenderFn};

pub struct StateColumn<T> {
    render: RenderFn<T>,
    key: &'static str,
}

impl<T> StateColumn<T> {
    pub fn new(render: RenderFn<T>, key: &'static str) -> Self {
        Self { render, key }
    }
}

impl<T: PanelState> Column for StateColumn<T> {
    /// The caller's function composes the whole panel; the layout must not rewrap it.
    fn no_wrap(&self) -> bool {
        true
    }

    fn render(
        &self,
        _ctx: &RenderContext,
        task: &PanelTask,
        _elapsed: Duration,
    ) -> PanelResult<Text<'static>> {
        let state: T = task.state().get(self.key)?;
        Ok((self.render)(&state))
    }
}
