//! Alert Manager Implementation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tank_geometry::MeasureError;
use tracing::{debug, info, warn};

/// Alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Cooldown period between duplicate alerts (seconds)
    pub cooldown_seconds: u64,
    /// Maximum alerts per hour before throttling
    pub max_alerts_per_hour: usize,
    /// Deviation past the sensed range that escalates to high (cm)
    pub high_deviation_cm: f64,
    /// Deviation past the sensed range that escalates to critical (cm)
    pub critical_deviation_cm: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: 1800, // 30 minutes
            max_alerts_per_hour: 10,
            high_deviation_cm: 10.0,
            critical_deviation_cm: 25.0,
        }
    }
}

/// How urgent an out-of-range condition is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Just past the sensed range
    Notice,
    /// Well outside the range; someone should look soon
    High,
    /// Tank nearly dry or spilling over
    Critical,
}

/// An alert accepted for delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Identifier of the tank the reading came from
    pub tank_id: String,
    /// Which side of the range was violated
    pub error: MeasureError,
    /// Urgency derived from the deviation magnitude
    pub severity: Severity,
    /// Filtered level at the time of the alert (cm)
    pub level_cm: f64,
    /// Distance past the sensed range (cm)
    pub deviation_cm: f64,
    /// When the alert was raised
    pub raised_at: DateTime<Utc>,
}

/// Bookkeeping for one (tank, fault) pair
#[derive(Debug, Clone)]
pub struct AlertState {
    /// Last time this alert was fired
    pub last_fired: Instant,
    /// Number of times fired
    pub fire_count: usize,
    /// Whether the alert has been acknowledged
    pub acknowledged: bool,
}

/// Alert manager for deduplication and throttling
pub struct AlertManager {
    config: AlertConfig,
    /// Alert states keyed by tank id and fault kind
    states: HashMap<(String, MeasureError), AlertState>,
    /// Alerts fired in the current hour
    hourly_count: usize,
    /// Hour window start
    hour_start: Instant,
}

impl AlertManager {
    /// Create a new alert manager
    pub fn new(config: AlertConfig) -> Self {
        info!("creating alert manager with config: {:?}", config);
        Self {
            config,
            states: HashMap::new(),
            hourly_count: 0,
            hour_start: Instant::now(),
        }
    }

    /// Map a deviation past the sensed range to a severity
    pub fn severity(&self, deviation_cm: f64) -> Severity {
        if deviation_cm >= self.config.critical_deviation_cm {
            Severity::Critical
        } else if deviation_cm >= self.config.high_deviation_cm {
            Severity::High
        } else {
            Severity::Notice
        }
    }

    /// Whether an alert for this (tank, fault) pair should fire now.
    ///
    /// In-range readings never fire. A pair in its cooldown window, or an
    /// exhausted hourly budget, suppresses the alert.
    pub fn should_fire(&mut self, tank_id: &str, error: MeasureError) -> bool {
        if !error.is_fault() {
            return false;
        }

        // Roll the hourly window
        if self.hour_start.elapsed() > Duration::from_secs(3600) {
            self.hourly_count = 0;
            self.hour_start = Instant::now();
        }

        if self.hourly_count >= self.config.max_alerts_per_hour {
            warn!("alert throttled for {}: hourly budget exhausted", tank_id);
            return false;
        }

        let key = (tank_id.to_string(), error);
        if let Some(state) = self.states.get(&key) {
            let cooldown = Duration::from_secs(self.config.cooldown_seconds);
            if state.last_fired.elapsed() < cooldown {
                debug!("alert for {} {} still in cooldown", tank_id, error.label());
                return false;
            }
        }

        true
    }

    /// Record that an alert fired and build the deliverable alert
    pub fn record_fire(
        &mut self,
        tank_id: &str,
        error: MeasureError,
        level_cm: f64,
        deviation_cm: f64,
    ) -> Alert {
        let severity = self.severity(deviation_cm);
        self.hourly_count += 1;

        let state = self
            .states
            .entry((tank_id.to_string(), error))
            .or_insert(AlertState {
                last_fired: Instant::now(),
                fire_count: 0,
                acknowledged: false,
            });
        state.last_fired = Instant::now();
        state.fire_count += 1;
        state.acknowledged = false;

        info!(
            "alert raised: {} {} ({:?}, count {})",
            tank_id,
            error.label(),
            severity,
            state.fire_count
        );

        Alert {
            tank_id: tank_id.to_string(),
            error,
            severity,
            level_cm,
            deviation_cm,
            raised_at: Utc::now(),
        }
    }

    /// Deduplicate and raise in one step; `None` when suppressed
    pub fn raise(
        &mut self,
        tank_id: &str,
        error: MeasureError,
        level_cm: f64,
        deviation_cm: f64,
    ) -> Option<Alert> {
        if !self.should_fire(tank_id, error) {
            return None;
        }
        Some(self.record_fire(tank_id, error, level_cm, deviation_cm))
    }

    /// Acknowledge an alert; false when no such alert exists
    pub fn acknowledge(&mut self, tank_id: &str, error: MeasureError) -> bool {
        if let Some(state) = self.states.get_mut(&(tank_id.to_string(), error)) {
            state.acknowledged = true;
            info!("alert acknowledged: {} {}", tank_id, error.label());
            true
        } else {
            false
        }
    }

    /// Unacknowledged alerts
    pub fn pending(&self) -> Vec<(&str, MeasureError, &AlertState)> {
        self.states
            .iter()
            .filter(|(_, state)| !state.acknowledged)
            .map(|((tank_id, error), state)| (tank_id.as_str(), *error, state))
            .collect()
    }

    /// Alerts fired in the current hour window
    pub fn hourly_count(&self) -> usize {
        self.hourly_count
    }

    /// Forget all alert state
    pub fn clear(&mut self) {
        self.states.clear();
        self.hourly_count = 0;
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}
