//! Panel configuration: refresh cadence, clearing, and output mode.
//!
//! Project-level config: `.update-panel/config.yaml` (optional, safe to commit)
//! Environment overrides: `UPDATE_PANEL_MODE`, `UPDATE_PANEL_AUTO_REFRESH`
//!
//! Resolution: defaults → project file → environment.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, PanelResult};

/// Project-level config file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".update-panel/config.yaml";

/// How the render loop draws to its sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Live redraw on a TTY, fallback output everywhere else.
    #[default]
    Auto,
    /// Always redraw in place.
    Live,
    /// Always append static blocks.
    Fallback,
}

impl DisplayMode {
    /// Pick live or fallback for a sink.
    pub fn is_live(self, interactive: bool) -> bool {
        match self {
            DisplayMode::Auto => interactive,
            DisplayMode::Live => true,
            DisplayMode::Fallback => false,
        }
    }
}

impl FromStr for DisplayMode {
    type Err = PanelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(DisplayMode::Auto),
            "live" => Ok(DisplayMode::Live),
            "fallback" => Ok(DisplayMode::Fallback),
            other => Err(PanelError::Config(format!("unknown display mode `{other}`"))),
        }
    }
}

/// Render loop settings shared by every panel session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Redraw on a timer without explicit `refresh()` calls.
    pub auto_refresh: bool,
    /// Clear the live panel from the screen when the session ends.
    pub auto_clear: bool,
    /// Timer period for auto-refresh and fallback change detection.
    pub refresh_interval_ms: u64,
    pub mode: DisplayMode,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            auto_clear: true,
            refresh_interval_ms: 100,
            mode: DisplayMode::Auto,
        }
    }
}

impl PanelConfig {
    /// Load the project config (if any) and apply environment overrides.
    pub fn load() -> PanelResult<Self> {
        let mut config = Self::load_from(Path::new(PROJECT_CONFIG_PATH))?;
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> PanelResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> PanelResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `UPDATE_PANEL_*` overrides through a variable lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> PanelResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("UPDATE_PANEL_MODE") {
            self.mode = raw.parse()?;
        }
        if let Some(raw) = lookup("UPDATE_PANEL_AUTO_REFRESH") {
            self.auto_refresh = parse_bool(&raw).ok_or_else(|| {
                PanelError::Config(format!("UPDATE_PANEL_AUTO_REFRESH: expected a boolean, got `{raw}`"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> PanelResult<()> {
        if self.refresh_interval_ms == 0 {
            return Err(PanelError::Config(
                "refresh_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
