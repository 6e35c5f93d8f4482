//! Sensor source: the background producer of biometric readings.
//!
//! The source owns a background tokio task that produces one [`Reading`]
//! per update interval and publishes it into a [`ReadingSlot`], the single
//! piece of state shared between the producer task and the consumer tick.
//! The slot is replaced wholesale under a lock, so the consumer can never
//! observe a torn reading.
//!
//! Shutdown is cooperative: [`SensorSource::stop`] sends on a capacity-1
//! channel that the producer loop polls between ticks, then joins the task,
//! so once `stop` returns no further reading can be produced. A fault
//! inside the producer halts the task and records the failure in the
//! slot's health state; the source never goes quiet without signaling.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use vitalwatch_core::{PipelineResult, Reading, VitalParameter};

// ── Producer trait and synthetic generator ─────────────────────────────────

/// A producer of one reading per sensor tick.
///
/// The bundled implementation is [`SimulatedSensor`]; a real device driver
/// replaces it behind this trait. `sample` is called from the source's
/// background task and should return promptly.
pub trait SensorProducer: Send + 'static {
    /// Produce the next reading.
    ///
    /// An error is fatal to the background task: the source halts and
    /// records the fault in its health state.
    fn sample(&mut self) -> PipelineResult<Reading>;
}

/// Plausible generator ranges. Blood pressure is deliberately biased
/// toward hypertensive values so the abnormal path gets exercised.
const HEART_RATE_RANGE: (i32, i32) = (60, 100);
const SYSTOLIC_RANGE: (i32, i32) = (110, 140);
const DIASTOLIC_RANGE: (i32, i32) = (70, 90);
const TEMPERATURE_RANGE: (f64, f64) = (36.5, 37.5);
const RESPIRATORY_RANGE: (i32, i32) = (12, 20);
const SPO2_RANGE: (i32, i32) = (95, 100);

/// Synthetic sensor drawing each parameter independently from a fixed
/// plausible range.
pub struct SimulatedSensor {
    rng: StdRng,
}

impl SimulatedSensor {
    /// Create a generator seeded from the OS.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministically seeded generator.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorProducer for SimulatedSensor {
    fn sample(&mut self) -> PipelineResult<Reading> {
        let temperature = self
            .rng
            .gen_range(TEMPERATURE_RANGE.0..=TEMPERATURE_RANGE.1);

        Ok(Reading::new()
            .with(
                VitalParameter::HeartRate,
                f64::from(self.rng.gen_range(HEART_RATE_RANGE.0..=HEART_RATE_RANGE.1)),
            )
            .with(
                VitalParameter::SystolicBp,
                f64::from(self.rng.gen_range(SYSTOLIC_RANGE.0..=SYSTOLIC_RANGE.1)),
            )
            .with(
                VitalParameter::DiastolicBp,
                f64::from(self.rng.gen_range(DIASTOLIC_RANGE.0..=DIASTOLIC_RANGE.1)),
            )
            .with(
                VitalParameter::BodyTemperature,
                (temperature * 10.0).round() / 10.0,
            )
            .with(
                VitalParameter::RespiratoryRate,
                f64::from(
                    self.rng
                        .gen_range(RESPIRATORY_RANGE.0..=RESPIRATORY_RANGE.1),
                ),
            )
            .with(
                VitalParameter::Spo2,
                f64::from(self.rng.gen_range(SPO2_RANGE.0..=SPO2_RANGE.1)),
            ))
    }
}

// ── Shared slot ────────────────────────────────────────────────────────────

/// Lifecycle state of the producer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// No producer task is running.
    Idle,
    /// The producer task is running.
    Running,
    /// The producer task halted on a fault.
    Halted,
}

/// Snapshot of the producer task's health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHealth {
    /// Task lifecycle state.
    pub status: SourceStatus,
    /// Fault description when `status` is [`SourceStatus::Halted`].
    pub fault: Option<String>,
}

impl SourceHealth {
    /// Whether the producer halted on a fault.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.status == SourceStatus::Halted
    }

    /// Whether the producer task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == SourceStatus::Running
    }
}

#[derive(Debug)]
struct SlotState {
    latest: Option<Reading>,
    status: SourceStatus,
    fault: Option<String>,
}

/// The shared latest-reading slot: one producer writer, one consumer
/// reader. Reads clone the current reading; writes replace it wholesale.
#[derive(Debug, Clone)]
pub struct ReadingSlot {
    inner: Arc<RwLock<SlotState>>,
}

impl ReadingSlot {
    fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SlotState {
                latest: None,
                status: SourceStatus::Idle,
                fault: None,
            })),
        }
    }

    /// The most recently produced reading, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Reading> {
        self.inner.read().latest.clone()
    }

    /// Current producer health.
    #[must_use]
    pub fn health(&self) -> SourceHealth {
        let state = self.inner.read();
        SourceHealth {
            status: state.status,
            fault: state.fault.clone(),
        }
    }

    fn publish(&self, reading: Reading) {
        self.inner.write().latest = Some(reading);
    }

    fn mark_running(&self) {
        let mut state = self.inner.write();
        state.status = SourceStatus::Running;
        state.fault = None;
    }

    /// Running → Idle. A halt is preserved so the consumer still sees the
    /// fault after an explicit stop.
    fn mark_stopped(&self) {
        let mut state = self.inner.write();
        if state.status == SourceStatus::Running {
            state.status = SourceStatus::Idle;
        }
    }

    fn mark_halted(&self, fault: String) {
        let mut state = self.inner.write();
        state.status = SourceStatus::Halted;
        state.fault = Some(fault);
    }
}

// ── Source handle ──────────────────────────────────────────────────────────

/// Handle to the background sensor producer.
pub struct SensorSource {
    slot: ReadingSlot,
    interval: Arc<RwLock<Duration>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SensorSource {
    /// Create a source with an empty slot and no running producer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: ReadingSlot::new(),
            interval: Arc::new(RwLock::new(Duration::from_secs(1))),
            shutdown_tx: None,
            task: None,
        }
    }

    /// A cloneable handle to the shared latest-reading slot.
    #[must_use]
    pub fn slot(&self) -> ReadingSlot {
        self.slot.clone()
    }

    /// The most recently produced reading, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Reading> {
        self.slot.latest()
    }

    /// Current producer health.
    #[must_use]
    pub fn health(&self) -> SourceHealth {
        self.slot.health()
    }

    /// Whether the producer task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.slot.health().is_running()
    }

    /// Update the production interval. The producer re-reads it on every
    /// cycle, so the change applies without a restart.
    pub fn set_interval(&self, interval: Duration) {
        *self.interval.write() = interval;
    }

    /// Start producing one reading per `interval` with the given producer.
    ///
    /// No-op when a producer task is already running. The first reading is
    /// produced immediately.
    pub fn start<P: SensorProducer>(&mut self, producer: P, interval: Duration) {
        if self.is_running() {
            tracing::debug!("sensor source already running");
            return;
        }
        *self.interval.write() = interval;
        tracing::info!(interval_secs = interval.as_secs_f64(), "sensor source started");

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        self.shutdown_tx = Some(shutdown_tx);
        self.slot.mark_running();

        let slot = self.slot.clone();
        let interval = Arc::clone(&self.interval);
        self.task = Some(tokio::spawn(async move {
            run_producer_loop(producer, slot, interval, shutdown_rx).await;
        }));
    }

    /// Stop the producer and wait for its task to exit. Idempotent; once
    /// this returns, no further reading is produced.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // Send fails only when the task already exited on its own.
            let _ = tx.send(()).await;
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
            tracing::info!("sensor source stopped");
        }
    }
}

impl Default for SensorSource {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_producer_loop<P: SensorProducer>(
    mut producer: P,
    slot: ReadingSlot,
    interval: Arc<RwLock<Duration>>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    tracing::debug!("sensor producer loop started");
    loop {
        match producer.sample() {
            Ok(reading) => slot.publish(reading),
            Err(e) => {
                tracing::error!(error = %e, "sensor producer fault, halting source");
                slot.mark_halted(e.to_string());
                return;
            }
        }

        let pause = *interval.read();
        tokio::select! {
            _ = shutdown_rx.recv() => {
                tracing::info!("sensor source shutdown requested");
                break;
            }
            () = tokio::time::sleep(pause) => {}
        }
    }
    slot.mark_stopped();
    tracing::debug!("sensor producer loop ended");
}
