//! Pipeline orchestrator: drives one normalize → classify → predict →
//! alert pass per poll tick and owns all consumer-side state.
//!
//! The tick cadence is the host's (typically a UI poll interval), fully
//! decoupled from the producer's own cadence: a tick reads whatever the
//! latest reading is, and may re-process an unchanged one. Alerts are
//! edge-triggered from the active-state sets (a parameter alerts when it
//! *enters* the abnormal set, a risk when its message first appears), and
//! both sets are cleared on stop, so a restart re-alerts on anything still
//! abnormal.

use std::collections::BTreeSet;
use std::path::Path;

use vitalwatch_core::{
    Alert, Classification, MonitorSettings, Reading, RiskFinding, Severity, VitalParameter,
};

use crate::alerting::AlertManager;
use crate::classifier::classify;
use crate::normalizer::normalize;
use crate::risk::RiskPredictor;
use crate::source::{SensorProducer, SensorSource, SimulatedSensor, SourceHealth};

/// Everything the renderer needs for one display refresh.
#[derive(Debug, Clone)]
pub struct MonitorSnapshot {
    /// The normalized reading this tick processed.
    pub reading: Reading,
    /// Per-parameter classification of that reading.
    pub classification: Classification,
    /// Currently active persistent-abnormality findings.
    pub risks: Vec<RiskFinding>,
    /// Live alert feed, oldest first (bounded).
    pub alerts: Vec<Alert>,
    /// Total alerts raised so far (unbounded counter).
    pub alerts_total: u64,
    /// Producer health at the start of the tick.
    pub source: SourceHealth,
}

impl MonitorSnapshot {
    /// Parameters classified abnormal this tick, in canonical order.
    #[must_use]
    pub fn abnormal_parameters(&self) -> Vec<VitalParameter> {
        self.classification
            .iter()
            .filter(|(_, status)| status.is_abnormal())
            .map(|(&parameter, _)| parameter)
            .collect()
    }
}

/// Display collaborator: receives one snapshot per tick.
pub trait MonitorRenderer {
    /// Refresh the display from `snapshot`.
    fn render(&mut self, snapshot: &MonitorSnapshot);
}

/// The monitoring pipeline: sensor source, processing stages, alerting,
/// and the active-state sets that make alerts edge-triggered.
pub struct Monitor {
    settings: MonitorSettings,
    source: SensorSource,
    predictor: RiskPredictor,
    alerts: AlertManager,
    current_abnormal: BTreeSet<VitalParameter>,
    current_risks: BTreeSet<String>,
    fault_reported: bool,
}

impl Monitor {
    /// Create a monitor with the given settings, logging alerts to
    /// `alert_log_path`.
    pub fn new(settings: MonitorSettings, alert_log_path: impl AsRef<Path>) -> Self {
        Self {
            settings,
            source: SensorSource::new(),
            predictor: RiskPredictor::new(),
            alerts: AlertManager::new(alert_log_path.as_ref()),
            current_abnormal: BTreeSet::new(),
            current_risks: BTreeSet::new(),
            fault_reported: false,
        }
    }

    /// The active settings.
    #[must_use]
    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Atomically replace the active settings. Classification uses the
    /// new ranges on the next tick; the producer picks up a changed
    /// interval on its next cycle.
    pub fn apply_settings(&mut self, settings: MonitorSettings) {
        self.source.set_interval(settings.update_interval());
        self.settings = settings;
        tracing::info!("settings applied");
    }

    /// Start the synthetic sensor at the configured update interval.
    pub fn start(&mut self) {
        self.start_with_producer(SimulatedSensor::new());
    }

    /// Start monitoring with a custom producer (device drivers, replay).
    pub fn start_with_producer<P: SensorProducer>(&mut self, producer: P) {
        self.fault_reported = false;
        self.source.start(producer, self.settings.update_interval());
        tracing::info!("monitoring started");
    }

    /// Stop the sensor source and clear the active-state sets, so a
    /// restart re-alerts on anything still abnormal. Returns once the
    /// producer task has exited.
    pub async fn stop(&mut self) {
        self.source.stop().await;
        self.current_abnormal.clear();
        self.current_risks.clear();
        tracing::info!("monitoring stopped, active alert state cleared");
    }

    /// Whether the producer task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.source.is_running()
    }

    /// The alert manager (feed, counters, log path).
    #[must_use]
    pub fn alerts(&self) -> &AlertManager {
        &self.alerts
    }

    /// Run one orchestrator tick against the latest produced reading
    /// (an empty reading before the first production).
    pub fn tick(&mut self) -> MonitorSnapshot {
        let health = self.source.health();
        let raw = self.source.latest().unwrap_or_default();
        self.process(raw, health)
    }

    /// Run one tick and hand the snapshot to the renderer.
    pub fn tick_with(&mut self, renderer: &mut dyn MonitorRenderer) -> MonitorSnapshot {
        let snapshot = self.tick();
        renderer.render(&snapshot);
        snapshot
    }

    fn process(&mut self, raw: Reading, health: SourceHealth) -> MonitorSnapshot {
        let reading = normalize(&raw);
        let classification = classify(&reading, &self.settings);

        // Alert on parameters entering the abnormal state, not on every
        // tick they remain in it.
        let new_abnormal: BTreeSet<VitalParameter> = classification
            .iter()
            .filter(|(_, status)| status.is_abnormal())
            .map(|(&parameter, _)| parameter)
            .collect();
        for &parameter in new_abnormal.difference(&self.current_abnormal) {
            if let Some(value) = reading.get(parameter) {
                self.alerts.notify(
                    format!("{parameter} reading is abnormal: {value}"),
                    Severity::Warning,
                );
            }
        }
        self.current_abnormal = new_abnormal;

        // Same edge-triggering for persistent-abnormality findings,
        // keyed by message text.
        let risks = self.predictor.update(&classification);
        let new_risks: BTreeSet<String> = risks.iter().map(|f| f.message.clone()).collect();
        for message in new_risks.difference(&self.current_risks) {
            self.alerts.notify(message.clone(), Severity::Critical);
        }
        self.current_risks = new_risks;

        // A halted producer is surfaced once per halt; the loop keeps
        // running on the last good reading.
        if health.is_halted() && !self.fault_reported {
            let fault = health.fault.clone().unwrap_or_else(|| "unknown fault".to_string());
            tracing::error!(fault = %fault, "sensor source halted");
            self.alerts
                .notify(format!("Sensor source halted: {fault}"), Severity::Critical);
            self.fault_reported = true;
        }

        MonitorSnapshot {
            reading,
            classification,
            risks,
            alerts: self.alerts.recent(),
            alerts_total: self.alerts.total_raised(),
            source: health,
        }
    }
}
