//! Tank Level Monitor - Main Entry Point

use alerting::AlertManager;
use anyhow::Context;
use level_gauge::LevelGauge;
use monitor::{init_logging, MockSensor, Settings, TankScheduler};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Tank Level Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "monitor".to_string());
    let settings = Settings::load(&path).context("loading settings")?;
    settings.validate().context("validating settings")?;

    let mut scheduler = TankScheduler::new(
        settings.scheduler.clone(),
        AlertManager::new(settings.alerts.clone()),
    );
    for entry in &settings.tanks {
        let gauge = LevelGauge::new(entry.tank.clone(), entry.gauge.clone())
            .with_context(|| format!("configuring gauge for tank {}", entry.id))?;
        // Hardware drivers are out of scope; each tank gets a mock that
        // sweeps the full sensed range
        let sensor = MockSensor::new(
            entry.gauge.min_level_cm,
            1.0,
            f64::from(entry.tank.height),
        );
        scheduler.add_tank(&entry.id, gauge, Box::new(sensor), entry.priority);
    }

    let (tx, mut rx) = mpsc::channel(64);
    let scheduler_task = tokio::spawn(scheduler.run(tx));

    while let Some(sample) = rx.recv().await {
        match &sample.alert {
            Some(alert) => warn!(
                "ALERT [{:?}] {}: {} at {:.1} cm ({:.1} cm past range)",
                alert.severity,
                alert.tank_id,
                alert.error.label(),
                alert.level_cm,
                alert.deviation_cm
            ),
            None => info!(
                "{}: {:.1} cm, {:.1} l",
                sample.tank_id, sample.measurement.level_cm, sample.measurement.volume_l
            ),
        }
    }

    scheduler_task.await.context("scheduler task panicked")?;
    Ok(())
}
