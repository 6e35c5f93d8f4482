//! Single-subject biometric monitoring pipeline.
//!
//! A background producer publishes one [`Reading`] per update interval
//! into a shared latest-reading slot; a consumer tick, driven by the
//! host's poll cadence, pulls the latest reading through four stages:
//!
//! 1. **Normalization** ([`normalizer::normalize`]): absent parameters
//!    are filled with clinically-neutral defaults; a reading is never
//!    rejected.
//! 2. **Classification** ([`classifier::classify`]): each parameter is
//!    tagged normal/abnormal/unknown against its configured range,
//!    boundaries inclusive.
//! 3. **Risk prediction** ([`RiskPredictor`]): a bounded per-parameter
//!    history window flags *persistent* abnormality (all of the last five
//!    classifications abnormal).
//! 4. **Alerting** ([`AlertManager`]): state transitions (a parameter
//!    entering the abnormal set, a risk message first appearing, the
//!    producer halting) become alerts, appended to a durable log and a
//!    bounded live feed.
//!
//! The [`Monitor`] orchestrator owns all consumer-side state and hands a
//! [`MonitorSnapshot`] to the display collaborator each tick.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use vitalwatch_core::MonitorSettings;
//! use vitalwatch_pipeline::Monitor;
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = MonitorSettings::load(Path::new("settings.json"));
//!     let mut monitor = Monitor::new(settings, "alerts.log");
//!     monitor.start();
//!
//!     let mut poll = tokio::time::interval(Duration::from_millis(500));
//!     for _ in 0..20 {
//!         poll.tick().await;
//!         let snapshot = monitor.tick();
//!         println!("abnormal: {:?}", snapshot.abnormal_parameters());
//!     }
//!
//!     monitor.stop().await;
//! }
//! ```

#![warn(missing_docs)]

pub mod alerting;
pub mod classifier;
pub mod monitor;
pub mod normalizer;
pub mod risk;
pub mod source;

pub use alerting::{AlertManager, ALERT_FEED_CAPACITY};
pub use monitor::{Monitor, MonitorRenderer, MonitorSnapshot};
pub use risk::{RiskPredictor, HISTORY_WINDOW};
pub use source::{
    ReadingSlot, SensorProducer, SensorSource, SimulatedSensor, SourceHealth, SourceStatus,
};

pub use vitalwatch_core::Reading;
