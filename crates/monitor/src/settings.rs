//! Monitor Settings
//!
//! Layered configuration: an optional settings file, overridden by
//! `TANK_MONITOR_*` environment variables.

use crate::scheduler::SchedulerConfig;
use alerting::AlertConfig;
use config::{Config, ConfigError, Environment, File};
use level_gauge::{GaugeConfig, GaugeError, LevelGauge};
use serde::Deserialize;
use tank_geometry::{TankGeometryError, WaterTank};
use thiserror::Error;
use tracing::info;

/// Problems with loaded settings that the config layer cannot catch
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No tanks configured, nothing to monitor
    #[error("settings contain no tanks")]
    NoTanks,

    /// Two tank entries share an id
    #[error("duplicate tank id: {0}")]
    DuplicateTankId(String),

    /// A tank entry fails the physical invariants
    #[error("tank {id}: {source}")]
    InvalidTank {
        id: String,
        source: TankGeometryError,
    },

    /// A gauge section the tank cannot satisfy
    #[error("gauge for tank {id}: {source}")]
    InvalidGauge { id: String, source: GaugeError },

    /// A scheduler rate that would stall or break the rotation
    #[error("scheduler {field} must be a positive finite number, got {value}")]
    InvalidRate { field: &'static str, value: f64 },
}

/// One monitored tank in the settings file
#[derive(Debug, Clone, Deserialize)]
pub struct TankEntry {
    /// Identifier used in logs, alerts, and the sampling rotation
    pub id: String,
    /// Physical description of the tank
    pub tank: WaterTank,
    /// Sensed-range configuration; defaults suit the datasheet tank
    #[serde(default)]
    pub gauge: GaugeConfig,
    /// Sampling priority on due-time ties
    #[serde(default)]
    pub priority: u8,
}

/// Top-level settings for the monitor binary
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Monitored tanks
    #[serde(default)]
    pub tanks: Vec<TankEntry>,
    /// Scheduler tuning
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Alert deduplication tuning
    #[serde(default)]
    pub alerts: AlertConfig,
}

impl Settings {
    /// Load settings from `path` (any format the config crate supports),
    /// then apply `TANK_MONITOR_*` environment overrides
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        info!("loading settings from {}", path);
        let loaded = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TANK_MONITOR").separator("__"))
            .build()?;
        loaded.try_deserialize()
    }

    /// Check invariants the deserializer cannot: tank physics, gauge
    /// ranges, id uniqueness, and scheduler rates
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tanks.is_empty() {
            return Err(SettingsError::NoTanks);
        }
        let mut seen = std::collections::HashSet::new();
        for entry in &self.tanks {
            if !seen.insert(entry.id.as_str()) {
                return Err(SettingsError::DuplicateTankId(entry.id.clone()));
            }
            entry
                .tank
                .validate()
                .map_err(|source| SettingsError::InvalidTank {
                    id: entry.id.clone(),
                    source,
                })?;
            // Same constructor main uses later, so a settings file that
            // passes here cannot abort gauge setup
            LevelGauge::new(entry.tank.clone(), entry.gauge.clone()).map_err(|source| {
                SettingsError::InvalidGauge {
                    id: entry.id.clone(),
                    source,
                }
            })?;
        }

        let rates = [
            ("base_rate_hz", self.scheduler.base_rate_hz),
            ("boost_multiplier", self.scheduler.boost_multiplier),
        ];
        for (field, value) in rates {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::InvalidRate { field, value });
            }
        }
        Ok(())
    }
}
