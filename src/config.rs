// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_true() -> bool {
    true
}

fn default_history_days() -> u32 {
    7
}

/// Upper bound for `usage_history_days`; one query per day is issued.
pub const MAX_HISTORY_DAYS: u32 = 366;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Re-query today's total even when a cached value exists. Past days are
    /// always served from the cache once present.
    #[serde(default = "default_true")]
    pub refresh_today_usage: bool,

    /// Number of days shown in the usage chart.
    #[serde(default = "default_history_days")]
    pub usage_history_days: u32,

    #[serde(default = "default_true")]
    pub show_light_sensor: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Match the serde defaults
            refresh_today_usage: true,
            usage_history_days: 7,
            show_light_sensor: true,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config.clamped())
    }

    /// Keeps `usage_history_days` within `1..=MAX_HISTORY_DAYS`.
    pub fn clamped(mut self) -> Self {
        self.usage_history_days = self.usage_history_days.clamp(1, MAX_HISTORY_DAYS);
        self
    }

    /// Detects whether an error from `load` means the file simply isn't there yet.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&path, toml_str)?;
        Ok(())
    }

    /// Load, writing the defaults on first run. Any other failure is logged and
    /// the defaults are used for this session without touching the file.
    pub fn load_or_init(ctx: &dyn AppContext) -> Self {
        match Self::load(ctx) {
            Ok(cfg) => cfg,
            Err(e) if Self::is_missing_config_error(&e) => {
                let cfg = Self::default();
                if let Err(e) = cfg.save(ctx) {
                    log::warn!("Failed to write default config: {}", e);
                }
                cfg
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }
}
