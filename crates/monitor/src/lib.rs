//! Tank Monitoring Pipeline
//!
//! Wires sensors, gauges, and alerting into a periodic sampling loop.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod scheduler;
mod sensor;
mod settings;

pub use scheduler::{ScheduledTank, SchedulerConfig, TankSample, TankScheduler};
pub use sensor::{LevelSensor, MockSensor, SensorError};
pub use settings::{Settings, SettingsError, TankEntry};

/// Install the global tracing subscriber
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
