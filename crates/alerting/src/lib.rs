//! Tank Level Alerting
//!
//! Deduplicates and throttles out-of-range level alerts so a tank that
//! sits below its minimum for an hour raises one alert, not thousands.

mod manager;

pub use manager::{Alert, AlertConfig, AlertManager, AlertState, Severity};
