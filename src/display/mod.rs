//! Live display engine: task list, columns, renderers, and the render loop.
//!
//! A `LiveDisplay` owns a sink and a set of columns. `start` runs a session
//! future alongside a render loop that repaints one row per task. On sinks
//! that cannot redraw in place, a fallback `Renderer` decides what gets
//! appended instead.
//!
//! ## Lifecycle
//!
//! 1. Validate configuration (nothing acquired yet)
//! 2. Call the session closure with a `LiveContext` (tasks registered here
//!    exist before the first pass)
//! 3. Spawn the render loop and the session future
//! 4. Await the session; a failing render loop aborts it instead
//! 5. Cancel the loop, which renders a final pass and restores the screen
//! 6. Return the session's result unchanged

pub mod column;
pub mod context;
pub mod layout;
pub mod renderer;
pub mod screen;
pub mod sink;
pub mod task;

mod runner;

pub use column::Column;
pub use context::{LiveContext, RenderContext};
pub use renderer::{LiveRenderer, Renderer};
pub use sink::{SharedBuffer, Sink};
pub use task::{PanelTask, TaskState};

use std::future::Future;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::PanelConfig;
use crate::error::{panic_message, PanelError};
use runner::Runner;
use screen::Screen;

/// Builder and entry point for one display session.
pub struct LiveDisplay {
    sink: Sink,
    config: PanelConfig,
    columns: Vec<Arc<dyn Column>>,
    fallback: Option<Arc<dyn Renderer>>,
}

impl LiveDisplay {
    /// Display on `sink` with default config and no columns.
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            config: PanelConfig::default(),
            columns: Vec::new(),
            fallback: None,
        }
    }

    pub fn with_config(mut self, config: PanelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn columns(mut self, columns: Vec<Arc<dyn Column>>) -> Self {
        self.columns = columns;
        self
    }

    /// Renderer used instead of the column grid when the sink cannot redraw.
    pub fn fallback_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.fallback = Some(renderer);
        self
    }

    /// Run `session` while the render loop draws, and return its result.
    ///
    /// The closure itself runs synchronously before the loop starts; the
    /// future it returns runs as its own task. Errors from the session are
    /// returned unmodified. A session panic is resumed on the caller after
    /// the display is torn down.
    pub async fn start<R, E, F, Fut>(self, session: F) -> Result<R, E>
    where
        F: FnOnce(LiveContext) -> Fut,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Send + 'static,
        E: From<PanelError> + Send + 'static,
    {
        self.config.validate()?;

        let live = self.config.mode.is_live(self.sink.is_interactive());
        let renderer: Arc<dyn Renderer> = match (live, self.fallback) {
            (false, Some(fallback)) => fallback,
            _ => Arc::new(LiveRenderer::new(self.columns)),
        };

        let ctx = LiveContext::new();
        let work = session(ctx.clone());

        debug!(live, mode = ?self.config.mode, "display session starting");
        let cancel = CancellationToken::new();
        let runner = Runner::new(ctx, Screen::new(self.sink, live), renderer, &self.config);
        let mut render_loop = tokio::spawn(runner.run(cancel.clone()));
        let mut producer = tokio::spawn(work);
        let _guard = SessionGuard {
            cancel: cancel.clone(),
            producer: producer.abort_handle(),
        };

        let joined = tokio::select! {
            joined = &mut producer => joined,
            stopped = &mut render_loop => {
                producer.abort();
                let err = match stopped {
                    Ok(Ok(())) => PanelError::RenderLoopStopped,
                    Ok(Err(e)) => e,
                    Err(e) => render_join_error(e),
                };
                warn!(error = %err, "render loop failed, aborting session");
                return Err(E::from(err));
            }
        };

        cancel.cancel();
        let rendered = match render_loop.await {
            Ok(result) => result,
            Err(e) => Err(render_join_error(e)),
        };
        debug!("display session finished");

        let result = match joined {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => return Err(E::from(PanelError::ProducerCancelled)),
        };
        match (result, rendered) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(E::from(err)),
            (Err(err), _) => Err(err),
        }
    }
}

/// Stops the loop and the session if `start` is dropped mid-flight.
struct SessionGuard {
    cancel: CancellationToken,
    producer: AbortHandle,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.producer.abort();
    }
}

fn render_join_error(e: JoinError) -> PanelError {
    if e.is_panic() {
        PanelError::RenderPanicked(panic_message(e.into_panic().as_ref()))
    } else {
        PanelError::RenderLoopStopped
    }
}
