//! update-panel: a live terminal panel fed by a concurrent producer.
//!
//! A producer task publishes typed state through a `PanelContext`; a render
//! loop repaints the panel from the latest value. On sinks that cannot
//! redraw in place, each distinct state is appended once instead.
//!
//! ```no_run
//! use ratatui::text::Text;
//! use update_panel::{update_panel, PanelError};
//!
//! # async fn example() -> Result<(), PanelError> {
//! let total = update_panel::<u32>()
//!     .render(|n| Text::raw(format!("processed {n}")))
//!     .start(|ctx| async move {
//!         for n in 1..=10 {
//!             ctx.set_status(n);
//!         }
//!         Ok::<_, PanelError>(10)
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod demo;
pub mod display;
pub mod error;
pub mod panel;

pub use config::{DisplayMode, PanelConfig};
pub use error::{PanelError, PanelResult};
pub use panel::{update_panel, PanelContext, PanelState, UpdatePanel};
