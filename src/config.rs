//! Configuration surface for the input layer.
//!
//! Settings are an explicit value handed to the handler at construction,
//! not process-wide state. They can be loaded from a TOML file under the
//! platform config directory; everything has a sensible default so an empty
//! or missing file is fine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::control::Control;
use crate::mapping::tables::default_keyboard_table;

/// Default analog deadzone (20%).
pub const DEFAULT_DEADZONE: f32 = 0.2;

/// Default polling tick budget (200 Hz).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read configuration file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Analog deadzone in [0.0, 1.0].
    pub deadzone: f32,

    /// Polling tick budget in milliseconds.
    pub poll_interval_ms: u64,

    /// Keyboard overrides merged on top of the default table, keyed by raw
    /// key code (for example `KEY_UP`).
    pub keyboard_mapping: HashMap<String, Control>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            deadzone: DEFAULT_DEADZONE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            keyboard_mapping: HashMap::new(),
        }
    }
}

impl InputSettings {
    /// Loads and validates settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("loading input settings from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Platform config file location, `<config dir>/unipad/input.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("unipad").join("input.toml"))
    }

    /// Fails fast on programmer or file errors instead of letting a bad
    /// value reach the polling loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.deadzone) {
            return Err(ConfigError::Invalid(format!(
                "deadzone {} is outside [0.0, 1.0]",
                self.deadzone
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The effective keyboard table: defaults overlaid with any configured
    /// overrides (override keys are uppercased to match lookup).
    pub fn keyboard_table(&self) -> HashMap<String, Control> {
        let mut table = default_keyboard_table();
        for (code, control) in &self.keyboard_mapping {
            table.insert(code.to_ascii_uppercase(), *control);
        }
        table
    }
}
