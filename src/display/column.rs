//! Column contract: one cell of a task row per render pass.

use std::time::Duration;

use ratatui::text::Text;

use super::context::RenderContext;
use super::task::PanelTask;
use crate::error::PanelResult;

/// Renders one cell for a task. Called once per live pass per task.
pub trait Column: Send + Sync {
    /// When true the layout truncates this cell's row instead of wrapping it.
    fn no_wrap(&self) -> bool {
        false
    }

    /// Produce the cell for `task`. `elapsed` is the time since the task was added.
    fn render(
        &self,
        ctx: &RenderContext,
        task: &PanelTask,
        elapsed: Duration,
    ) -> PanelResult<Text<'static>>;
}

/// Test column: the task description.
#[cfg(test)]
pub(crate) struct DescriptionColumn;

#[cfg(test)]
impl Column for DescriptionColumn {
    fn render(
        &self,
        _ctx: &RenderContext,
        task: &PanelTask,
        _elapsed: Duration,
    ) -> PanelResult<Text<'static>> {
        Ok(Text::raw(task.description().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: RenderContext = RenderContext {
        width: 80,
        live: true,
    };

    struct Elapsed;

    impl Column for Elapsed {
        fn no_wrap(&self) -> bool {
            true
        }

        fn render(
            &self,
            _ctx: &RenderContext,
            _task: &PanelTask,
            elapsed: Duration,
        ) -> PanelResult<Text<'static>> {
            Ok(Text::raw(format!("{}s", elapsed.as_secs())))
        }
    }

    #[test]
    fn wrapping_is_the_default() {
        let task = PanelTask::new(0, "fetching".into());
        let text = DescriptionColumn
            .render(&CTX, &task, Duration::ZERO)
            .unwrap();
        assert_eq!(text.lines[0].to_string(), "fetching");
        assert!(!DescriptionColumn.no_wrap());
    }

    #[test]
    fn columns_receive_elapsed_time() {
        let task = PanelTask::new(0, "t".into());
        let text = Elapsed.render(&CTX, &task, Duration::from_secs(125)).unwrap();
        assert_eq!(text.lines[0].to_string(), "125s");
        assert!(Elapsed.no_wrap());
    }
}
