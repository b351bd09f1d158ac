//! Renderer strategies plugged into the render loop.
//!
//! Each pass calls `update` (observe tasks, prepare output) then `process`
//! (merge prepared output into the pass's render stream). `LiveRenderer`
//! builds the column grid; other renderers, such as the update panel's
//! fallback, can replace it on sinks that cannot redraw.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use ratatui::text::{Line, Text};

use super::column::Column;
use super::context::{LiveContext, RenderContext};
use super::layout::{compose_row, Cell};
use crate::error::PanelResult;

/// Live grid frames are capped at roughly 60 per second.
const LIVE_FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub trait Renderer: Send + Sync {
    /// Passes closer together than this are delayed. Zero: never delayed.
    fn min_refresh_interval(&self) -> Duration;

    /// Observe the current tasks and prepare this pass's output.
    fn update(&self, ctx: &LiveContext, render: &RenderContext) -> PanelResult<()>;

    /// Return `renderables` plus whatever `update` prepared.
    fn process(&self, render: &RenderContext, renderables: Vec<Text<'static>>)
        -> Vec<Text<'static>>;
}

/// One row per task, one cell per column.
///
/// In append mode (used when no fallback renderer is configured) a frame
/// is only emitted when it differs from the previous one.
pub struct LiveRenderer {
    columns: Vec<Arc<dyn Column>>,
    frames: Mutex<Frames>,
}

#[derive(Default)]
struct Frames {
    pending: Option<Text<'static>>,
    last_appended: Option<Text<'static>>,
}

impl LiveRenderer {
    pub fn new(columns: Vec<Arc<dyn Column>>) -> Self {
        Self {
            columns,
            frames: Mutex::new(Frames::default()),
        }
    }

    fn grid(&self, ctx: &LiveContext, render: &RenderContext) -> PanelResult<Text<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        for task in ctx.tasks() {
            let elapsed = task.elapsed();
            let mut cells = Vec::with_capacity(self.columns.len());
            for column in &self.columns {
                cells.push(Cell {
                    text: column.render(render, &task, elapsed)?,
                    no_wrap: column.no_wrap(),
                });
            }
            lines.extend(compose_row(cells, render.width));
        }
        Ok(Text::from(lines))
    }
}

impl Renderer for LiveRenderer {
    fn min_refresh_interval(&self) -> Duration {
        LIVE_FRAME_INTERVAL
    }

    fn update(&self, ctx: &LiveContext, render: &RenderContext) -> PanelResult<()> {
        let frame = self.grid(ctx, render)?;
        let mut frames = self.frames.lock();
        if !render.live && frames.last_appended.as_ref() == Some(&frame) {
            frames.pending = None;
            return Ok(());
        }
        if !render.live {
            frames.last_appended = Some(frame.clone());
        }
        frames.pending = Some(frame);
        Ok(())
    }

    fn process(
        &self,
        _render: &RenderContext,
        mut renderables: Vec<Text<'static>>,
    ) -> Vec<Text<'static>> {
        if let Some(frame) = self.frames.lock().pending.take() {
            renderables.push(frame);
        }
        renderables
    }
}
