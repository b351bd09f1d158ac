//! Update panel: a producer publishes typed state, the display renders it.
//!
//! The producer gets a `PanelContext<T>` and calls `set_status` whenever it
//! has something new. On a terminal the panel is redrawn in place from the
//! latest state. Anywhere else (pipes, CI logs) each distinct state is
//! appended once, using the fallback render function.
//!
//! Built on `display`: one placeholder task holds the state slot, a
//! `StateColumn` renders it live, and a `FallbackPanelRenderer` replaces the
//! grid when the sink cannot redraw.

pub mod column;
pub mod context;
pub mod fallback;

pub use column::StateColumn;
pub use context::PanelContext;
pub use fallback::FallbackPanelRenderer;

use std::future::Future;
use std::sync::Arc;

use ratatui::text::Text;
use tracing::debug;

use crate::config::PanelConfig;
use crate::display::{Column, LiveDisplay, Sink};
use crate::error::PanelError;

/// Slot key for the panel state on its task.
pub const STATE_KEY: &str = "update-panel";

/// Label of the placeholder task that anchors the state slot.
pub const TASK_LABEL: &str = "update-panel-column";

/// Caller-supplied state-to-text function.
pub type RenderFn<T> = Arc<dyn Fn(&T) -> Text<'static> + Send + Sync>;

/// Bounds on panel state.
///
/// `Eq` is required because the fallback path deduplicates by equality;
/// the comparison must be total and deterministic.
pub trait PanelState: Clone + Default + Eq + Send + Sync + 'static {}

impl<T> PanelState for T where T: Clone + Default + Eq + Send + Sync + 'static {}

/// Session builder. Configure render functions, then `start`.
pub struct UpdatePanel<T> {
    sink: Sink,
    config: PanelConfig,
    render: Option<RenderFn<T>>,
    fallback_render: Option<RenderFn<T>>,
}

/// Update panel on standard output with default settings.
pub fn update_panel<T: PanelState>() -> UpdatePanel<T> {
    UpdatePanel::stdout()
}

impl<T: PanelState> UpdatePanel<T> {
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            config: PanelConfig::default(),
            render: None,
            fallback_render: None,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Sink::stdout())
    }

    pub fn with_config(mut self, config: PanelConfig) -> Self {
        self.config = config;
        self
    }

    /// Redraw on a timer. On by default.
    pub fn auto_refresh(mut self, enabled: bool) -> Self {
        self.config.auto_refresh = enabled;
        self
    }

    /// Render function for the live panel (and the fallback, unless set).
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&T) -> Text<'static> + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Render function for non-interactive sinks.
    pub fn fallback_render<F>(mut self, render: F) -> Self
    where
        F: Fn(&T) -> Text<'static> + Send + Sync + 'static,
    {
        self.fallback_render = Some(Arc::new(render));
        self
    }

    /// Run `producer` while the panel is displayed; return its result.
    ///
    /// Fails with `PanelError::MissingRender` before anything starts if no
    /// render function was set. Producer errors come back unmodified after
    /// the display has been torn down.
    pub async fn start<R, E, F, Fut>(self, producer: F) -> Result<R, E>
    where
        F: FnOnce(PanelContext<T>) -> Fut,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Send + 'static,
        E: From<PanelError> + Send + 'static,
    {
        let Some(render) = self.render else {
            return Err(E::from(PanelError::MissingRender));
        };
        let fallback = self.fallback_render.unwrap_or_else(|| Arc::clone(&render));

        let columns: Vec<Arc<dyn Column>> = vec![Arc::new(StateColumn::new(render, STATE_KEY))];
        let display = LiveDisplay::new(self.sink)
            .with_config(self.config)
            .columns(columns)
            .fallback_renderer(Arc::new(FallbackPanelRenderer::new(fallback, STATE_KEY)));

        display
            .start(move |live| {
                let task = live.add_task(TASK_LABEL);
                task.state().set(STATE_KEY, T::default());
                debug!(task = task.id(), "update panel seeded");
                producer(PanelContext::new(live, task))
            })
            .await
    }

    /// Blocking form: run a synchronous producer and wait for the session.
    ///
    /// Builds its own tokio runtime. Called from inside a runtime it fails
    /// with `PanelError::Config` instead; use `start` there. The producer
    /// runs on a blocking thread while the render loop runs on the runtime.
    pub fn start_blocking<R, E, F>(self, producer: F) -> Result<R, E>
    where
        F: FnOnce(PanelContext<T>) -> Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: From<PanelError> + Send + 'static,
    {
        if self.render.is_none() {
            return Err(E::from(PanelError::MissingRender));
        }
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(E::from(PanelError::Config(
                "start_blocking called from inside a tokio runtime; use start".into(),
            )));
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| E::from(PanelError::Io(e)))?;

        let result = runtime.block_on(self.start(|ctx| async move {
            match tokio::task::spawn_blocking(move || producer(ctx)).await {
                Ok(result) => result,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => Err(E::from(PanelError::ProducerCancelled)),
            }
        }));
        // A producer abandoned by a failed render loop cannot be interrupted;
        // do not wait for it.
        runtime.shutdown_background();
        result
    }
}
