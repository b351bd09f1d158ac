//! Panel error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("no render function configured")]
    MissingRender,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("state slot `{key}` does not hold a {expected}")]
    StateTypeMismatch { key: String, expected: &'static str },

    #[error("expected at most one task, found {0}")]
    MultipleTasks(usize),

    #[error("render loop panicked: {0}")]
    RenderPanicked(String),

    #[error("render loop stopped before the session ended")]
    RenderLoopStopped,

    #[error("producer task was cancelled")]
    ProducerCancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type PanelResult<T> = Result<T, PanelError>;

/// Best-effort message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
