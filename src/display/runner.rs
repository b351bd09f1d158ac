//! Render loop: one spawned task per display session.
//!
//! Passes happen once at start, on every timer tick (when polling), on
//! every refresh request, and once more at shutdown so the final state is
//! never dropped. Refresh requests that arrive during a pass coalesce.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::text::Line;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::context::{LiveContext, RenderContext};
use super::layout::flatten;
use super::renderer::Renderer;
use super::screen::Screen;
use crate::config::PanelConfig;
use crate::error::PanelResult;

pub(crate) struct Runner {
    ctx: LiveContext,
    screen: Screen,
    renderer: Arc<dyn Renderer>,
    auto_refresh: bool,
    auto_clear: bool,
    interval: Duration,
    last_pass: Option<Instant>,
}

impl Runner {
    pub(crate) fn new(
        ctx: LiveContext,
        screen: Screen,
        renderer: Arc<dyn Renderer>,
        config: &PanelConfig,
    ) -> Self {
        Self {
            ctx,
            screen,
            renderer,
            auto_refresh: config.auto_refresh,
            auto_clear: config.auto_clear,
            interval: config.refresh_interval(),
            last_pass: None,
        }
    }

    pub(crate) async fn run(mut self, cancel: CancellationToken) -> PanelResult<()> {
        let live = self.screen.is_live();
        // The fallback path keeps polling so state changes are still seen
        // when auto-refresh is off; it only emits on change.
        let poll = self.auto_refresh || !live;
        debug!(live, auto_refresh = self.auto_refresh, "render loop started");

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        let ctx = self.ctx.clone();
        self.pass()?;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ctx.refresh_requested() => trace!("refresh requested"),
                _ = ticker.tick(), if poll => {}
            }
            self.throttle().await;
            self.pass()?;
        }

        self.pass()?;
        self.screen.finish(self.auto_clear)?;
        debug!("render loop stopped");
        Ok(())
    }

    async fn throttle(&mut self) {
        let min = self.renderer.min_refresh_interval();
        if let Some(last) = self.last_pass {
            let since = last.elapsed();
            if since < min {
                sleep(min - since).await;
            }
        }
    }

    fn pass(&mut self) -> PanelResult<()> {
        self.last_pass = Some(Instant::now());
        let render = RenderContext {
            width: self.screen.width(),
            live: self.screen.is_live(),
        };
        self.renderer.update(&self.ctx, &render)?;
        let lines: Vec<Line<'static>> = self
            .renderer
            .process(&render, Vec::new())
            .into_iter()
            .flat_map(flatten)
            .collect();

        if render.live {
            self.screen.draw(&lines)?;
        } else if !lines.is_empty() {
            trace!(lines = lines.len(), "appending block");
            self.screen.append(&lines)?;
        }
        Ok(())
    }
}
