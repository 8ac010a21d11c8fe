//! Tank Sampling Scheduler
//!
//! Priority-based scheduling of periodic level samples with rate boosting
//! while a tank reads outside its sensed range.

use crate::sensor::LevelSensor;
use alerting::{Alert, AlertManager};
use level_gauge::{LevelGauge, Measurement};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Configuration for the sampling scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Base sampling rate in Hz (default: 0.2, one sample per 5 s)
    pub base_rate_hz: f64,
    /// Consecutive sensor failures tolerated before a tank is dropped
    /// from the rotation
    pub max_retries: u8,
    /// Retry backoff base in milliseconds
    pub retry_backoff_ms: u64,
    /// Rate multiplier while a tank reads out of range
    pub boost_multiplier: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_rate_hz: 0.2,
            max_retries: 3,
            retry_backoff_ms: 500,
            boost_multiplier: 4.0,
        }
    }
}

/// A tank's place in the sampling rotation
#[derive(Debug, Clone)]
pub struct ScheduledTank {
    /// Tank identifier, key into the station table
    pub tank_id: String,
    /// Current sampling rate in Hz
    pub rate_hz: f64,
    /// Next scheduled sample time
    pub next_sample: Instant,
    /// Priority (higher = sampled first on ties)
    pub priority: u8,
    /// Consecutive sensor failures
    pub failures: u8,
}

impl ScheduledTank {
    fn new(tank_id: String, rate_hz: f64, priority: u8) -> Self {
        Self {
            tank_id,
            rate_hz,
            next_sample: Instant::now(),
            priority,
            failures: 0,
        }
    }

    /// Interval between samples at the current rate
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate_hz)
    }

    fn schedule_next(&mut self) {
        self.next_sample = Instant::now() + self.interval();
    }
}

impl Eq for ScheduledTank {}

impl PartialEq for ScheduledTank {
    fn eq(&self, other: &Self) -> bool {
        self.next_sample == other.next_sample && self.priority == other.priority
    }
}

impl Ord for ScheduledTank {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse the time ordering so the
        // earliest due tank surfaces first, then break ties by priority
        other
            .next_sample
            .cmp(&self.next_sample)
            .then_with(|| self.priority.cmp(&other.priority))
    }
}

impl PartialOrd for ScheduledTank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One delivered sample: the measurement plus any alert it raised
#[derive(Debug, Clone, Serialize)]
pub struct TankSample {
    /// Which tank the sample came from
    pub tank_id: String,
    /// The classified measurement
    pub measurement: Measurement,
    /// Alert accepted by the deduplicator, if any
    pub alert: Option<Alert>,
}

/// Gauge and sensor for one monitored tank
struct Station {
    gauge: LevelGauge,
    sensor: Box<dyn LevelSensor>,
}

/// Scheduler driving periodic samples across all monitored tanks
pub struct TankScheduler {
    /// Sampling rotation ordered by due time
    queue: BinaryHeap<ScheduledTank>,
    /// Gauge + sensor per tank id
    stations: HashMap<String, Station>,
    config: SchedulerConfig,
    alerts: AlertManager,
}

impl TankScheduler {
    /// Create an empty scheduler
    pub fn new(config: SchedulerConfig, alerts: AlertManager) -> Self {
        Self {
            queue: BinaryHeap::new(),
            stations: HashMap::new(),
            config,
            alerts,
        }
    }

    /// Add a tank to the rotation, due immediately
    pub fn add_tank(
        &mut self,
        tank_id: &str,
        gauge: LevelGauge,
        sensor: Box<dyn LevelSensor>,
        priority: u8,
    ) {
        info!(
            "scheduling tank {} at {} Hz (priority {})",
            tank_id, self.config.base_rate_hz, priority
        );
        self.stations
            .insert(tank_id.to_string(), Station { gauge, sensor });
        self.queue.push(ScheduledTank::new(
            tank_id.to_string(),
            self.config.base_rate_hz,
            priority,
        ));
    }

    /// Number of tanks still in the rotation
    pub fn tank_count(&self) -> usize {
        self.stations.len()
    }

    /// When the next sample is due
    pub fn next_due(&self) -> Option<Instant> {
        self.queue.peek().map(|entry| entry.next_sample)
    }

    /// Sample the next tank in the rotation.
    ///
    /// Returns `None` when the rotation is empty, the sensor failed, or
    /// the gauge discarded the reading. Failed sensors are retried with
    /// linear backoff and dropped from the rotation after `max_retries`
    /// consecutive failures.
    pub fn poll_once(&mut self) -> Option<TankSample> {
        let mut entry = self.queue.pop()?;
        let station = self.stations.get_mut(&entry.tank_id)?;

        let raw = match station.sensor.read_level() {
            Ok(raw) => raw,
            Err(err) => {
                entry.failures = entry.failures.saturating_add(1);
                if entry.failures > self.config.max_retries {
                    error!(
                        "sensor for {} unhealthy after {} failures, dropping from rotation",
                        entry.tank_id, entry.failures
                    );
                    self.stations.remove(&entry.tank_id);
                } else {
                    warn!(
                        "sensor read failed for {} (attempt {}): {}",
                        entry.tank_id, entry.failures, err
                    );
                    let backoff = self.config.retry_backoff_ms * u64::from(entry.failures);
                    entry.next_sample = Instant::now() + Duration::from_millis(backoff);
                    self.queue.push(entry);
                }
                return None;
            }
        };

        entry.failures = 0;
        let measurement = match station.gauge.measure(raw) {
            Ok(measurement) => measurement,
            Err(err) => {
                warn!("discarding reading from {}: {}", entry.tank_id, err);
                entry.schedule_next();
                self.queue.push(entry);
                return None;
            }
        };

        let deviation = station.gauge.deviation_cm(measurement.level_cm);
        let alert = self.alerts.raise(
            &entry.tank_id,
            measurement.error,
            measurement.level_cm,
            deviation,
        );

        // Sample faster while the level sits outside the sensed range
        entry.rate_hz = if measurement.error.is_fault() {
            self.config.base_rate_hz * self.config.boost_multiplier
        } else {
            self.config.base_rate_hz
        };
        entry.schedule_next();
        debug!(
            "sampled {}: {:.1} cm, next in {:?}",
            entry.tank_id,
            measurement.level_cm,
            entry.interval()
        );

        let sample = TankSample {
            tank_id: entry.tank_id.clone(),
            measurement,
            alert,
        };
        self.queue.push(entry);
        Some(sample)
    }

    /// Drive the rotation, delivering samples over `tx`.
    ///
    /// Runs until every tank has been dropped as unhealthy or the
    /// receiving side closes the channel.
    pub async fn run(mut self, tx: mpsc::Sender<TankSample>) {
        info!("scheduler running with {} tanks", self.tank_count());
        while let Some(due) = self.next_due() {
            let now = Instant::now();
            if due > now {
                tokio::time::sleep(due - now).await;
            }
            if let Some(sample) = self.poll_once() {
                if tx.send(sample).await.is_err() {
                    info!("sample channel closed, stopping scheduler");
                    return;
                }
            }
        }
        warn!("no healthy tanks left to sample");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::MockSensor;
    use level_gauge::GaugeConfig;
    use tank_geometry::{MeasureError, WaterTank};

    fn datasheet_gauge() -> LevelGauge {
        let tank = WaterTank::new(1000, 5.0, 150, 80, 120).unwrap();
        LevelGauge::new(tank, GaugeConfig::default()).unwrap()
    }

    fn test_scheduler() -> TankScheduler {
        TankScheduler::new(SchedulerConfig::default(), AlertManager::default())
    }

    #[test]
    fn test_empty_rotation() {
        let mut scheduler = test_scheduler();
        assert!(scheduler.next_due().is_none());
        assert!(scheduler.poll_once().is_none());
    }

    #[test]
    fn test_sample_delivers_measurement() {
        let mut scheduler = test_scheduler();
        let sensor = MockSensor::new(75.0, 0.0, 150.0);
        scheduler.add_tank("roof-a", datasheet_gauge(), Box::new(sensor), 0);

        let sample = scheduler.poll_once().expect("tank is due immediately");
        assert_eq!(sample.tank_id, "roof-a");
        assert_eq!(sample.measurement.error, MeasureError::None);
        assert!(sample.alert.is_none());
    }

    #[test]
    fn test_out_of_range_boosts_rate() {
        let mut scheduler = test_scheduler();
        // Constant 4 cm: below the default 10 cm minimum
        let sensor = MockSensor::new(4.0, 0.0, 150.0);
        scheduler.add_tank("roof-a", datasheet_gauge(), Box::new(sensor), 0);

        let sample = scheduler.poll_once().unwrap();
        assert_eq!(sample.measurement.error, MeasureError::BelowMin);
        assert!(sample.alert.is_some());

        let entry = scheduler.queue.peek().unwrap();
        let expected = SchedulerConfig::default().base_rate_hz
            * SchedulerConfig::default().boost_multiplier;
        assert!((entry.rate_hz - expected).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_fault_alerts_suppressed() {
        let mut scheduler = test_scheduler();
        let sensor = MockSensor::new(4.0, 0.0, 150.0);
        scheduler.add_tank("roof-a", datasheet_gauge(), Box::new(sensor), 0);

        let first = scheduler.poll_once().unwrap();
        assert!(first.alert.is_some());
        let second = scheduler.poll_once().unwrap();
        assert!(second.alert.is_none());
    }

    #[test]
    fn test_failing_sensor_dropped_after_retries() {
        let config = SchedulerConfig {
            max_retries: 2,
            retry_backoff_ms: 0,
            ..Default::default()
        };
        let mut scheduler = TankScheduler::new(config, AlertManager::default());
        let sensor = MockSensor::new(75.0, 0.0, 150.0).failing_every(1);
        scheduler.add_tank("roof-a", datasheet_gauge(), Box::new(sensor), 0);

        // Failures 1 and 2 stay in rotation, failure 3 exceeds max_retries
        assert!(scheduler.poll_once().is_none());
        assert_eq!(scheduler.tank_count(), 1);
        assert!(scheduler.poll_once().is_none());
        assert_eq!(scheduler.tank_count(), 1);
        assert!(scheduler.poll_once().is_none());
        assert_eq!(scheduler.tank_count(), 0);
        assert!(scheduler.next_due().is_none());
    }

    #[test]
    fn test_priority_breaks_due_ties() {
        let now = Instant::now();
        let mut low = ScheduledTank::new("low".to_string(), 1.0, 1);
        let mut high = ScheduledTank::new("high".to_string(), 1.0, 9);
        low.next_sample = now;
        high.next_sample = now;

        let mut queue = BinaryHeap::new();
        queue.push(low);
        queue.push(high);
        assert_eq!(queue.pop().unwrap().tank_id, "high");
    }

    #[tokio::test]
    async fn test_run_delivers_over_channel() {
        let config = SchedulerConfig {
            base_rate_hz: 100.0,
            ..Default::default()
        };
        let mut scheduler = TankScheduler::new(config, AlertManager::default());
        let sensor = MockSensor::new(75.0, 0.0, 150.0);
        scheduler.add_tank("roof-a", datasheet_gauge(), Box::new(sensor), 0);

        let (tx, mut rx) = mpsc::channel(4);
        let handle = tokio::spawn(scheduler.run(tx));

        let sample = rx.recv().await.expect("one sample");
        assert_eq!(sample.tank_id, "roof-a");

        // Closing the receiver stops the scheduler
        drop(rx);
        handle.await.unwrap();
    }
}
