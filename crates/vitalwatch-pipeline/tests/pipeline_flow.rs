//! End-to-end flow: background producer, consumer ticks, alerting, and
//! lifecycle transitions through the public API.

use std::time::Duration;

use vitalwatch_core::{MonitorSettings, PipelineError, PipelineResult, Reading, VitalParameter};
use vitalwatch_pipeline::{Monitor, MonitorRenderer, MonitorSnapshot, SensorProducer};

/// Producer that always reports a tachycardic heart rate, then faults
/// after a fixed number of samples (`u32::MAX` = never).
struct TachycardicProducer {
    calls: u32,
    fail_after: u32,
}

impl TachycardicProducer {
    fn steady() -> Self {
        Self {
            calls: 0,
            fail_after: u32::MAX,
        }
    }

    fn failing_after(n: u32) -> Self {
        Self {
            calls: 0,
            fail_after: n,
        }
    }
}

impl SensorProducer for TachycardicProducer {
    fn sample(&mut self) -> PipelineResult<Reading> {
        self.calls += 1;
        if self.calls > self.fail_after {
            return Err(PipelineError::producer("checksum mismatch on frame"));
        }
        Ok(Reading::new().with(VitalParameter::HeartRate, 130.0))
    }
}

struct CountingRenderer {
    renders: usize,
}

impl MonitorRenderer for CountingRenderer {
    fn render(&mut self, _snapshot: &MonitorSnapshot) {
        self.renders += 1;
    }
}

#[tokio::test(start_paused = true)]
async fn simulated_flow_produces_complete_classified_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let mut monitor = Monitor::new(MonitorSettings::default(), dir.path().join("alerts.log"));

    monitor.start();
    assert!(monitor.is_running());

    let mut renderer = CountingRenderer { renders: 0 };
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let snapshot = monitor.tick_with(&mut renderer);

        // Every tick sees a complete reading with one tag per parameter.
        assert_eq!(snapshot.reading.len(), 6);
        assert_eq!(snapshot.classification.len(), 6);
        assert!(snapshot.alerts.len() <= vitalwatch_pipeline::ALERT_FEED_CAPACITY);
    }
    assert_eq!(renderer.renders, 10);

    monitor.stop().await;
    assert!(!monitor.is_running());
}

#[tokio::test(start_paused = true)]
async fn persistent_abnormality_reaches_the_alert_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("alerts.log");
    let mut monitor = Monitor::new(MonitorSettings::default(), &log_path);

    monitor.start_with_producer(TachycardicProducer::steady());

    let mut last = None;
    for _ in 0..6 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        last = Some(monitor.tick());
    }
    let snapshot = last.unwrap();

    assert_eq!(snapshot.risks.len(), 1);
    assert_eq!(
        snapshot.risks[0].message,
        "Persistent abnormal heart_rate over last 5 readings."
    );

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("WARNING: heart_rate reading is abnormal: 130"));
    assert!(log.contains("CRITICAL: Persistent abnormal heart_rate over last 5 readings."));

    monitor.stop().await;
}

#[tokio::test(start_paused = true)]
async fn producer_fault_is_surfaced_within_one_tick() {
    let dir = tempfile::tempdir().unwrap();
    let mut monitor = Monitor::new(MonitorSettings::default(), dir.path().join("alerts.log"));

    monitor.start_with_producer(TachycardicProducer::failing_after(1));

    // Let the producer run into its fault, then take one poll tick.
    tokio::time::sleep(Duration::from_secs(3)).await;
    let snapshot = monitor.tick();

    assert!(snapshot.source.is_halted());
    let halt_alerts: Vec<_> = snapshot
        .alerts
        .iter()
        .filter(|a| a.message.contains("Sensor source halted"))
        .collect();
    assert_eq!(halt_alerts.len(), 1);
    assert!(halt_alerts[0].message.contains("checksum mismatch on frame"));

    // Stale data stops flowing: the slot keeps the last good reading.
    let frozen = snapshot.reading.clone();
    tokio::time::sleep(Duration::from_secs(3)).await;
    let next = monitor.tick();
    assert_eq!(next.reading, frozen);

    monitor.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_then_start_realerts_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut monitor = Monitor::new(MonitorSettings::default(), dir.path().join("alerts.log"));

    monitor.start_with_producer(TachycardicProducer::steady());
    tokio::time::sleep(Duration::from_secs(1)).await;
    monitor.tick();
    assert_eq!(monitor.alerts().total_raised(), 1);

    // Repeat ticks do not re-alert.
    tokio::time::sleep(Duration::from_secs(1)).await;
    monitor.tick();
    assert_eq!(monitor.alerts().total_raised(), 1);

    monitor.stop().await;
    monitor.start_with_producer(TachycardicProducer::steady());
    tokio::time::sleep(Duration::from_secs(1)).await;
    monitor.tick();
    assert_eq!(monitor.alerts().total_raised(), 2);

    monitor.stop().await;
}
