//! Domain types for the vitalwatch monitoring pipeline.
//!
//! This crate holds everything the pipeline stages agree on:
//!
//! - [`VitalParameter`]: the closed set of monitored biometric parameters.
//! - [`Reading`]: one synchronized set of parameter values produced per
//!   sensor tick.
//! - [`Classification`] / [`ParameterStatus`]: per-parameter
//!   normal/abnormal/unknown tags relative to configured ranges.
//! - [`Alert`] / [`Severity`]: operator notifications with a durable
//!   log-line form and a bounded live-feed form.
//! - [`MonitorSettings`]: the persisted configuration document (update
//!   interval plus per-parameter normal ranges) and its numeric-validated
//!   editor boundary ([`SettingsDraft`]).
//! - [`PipelineError`]: the error taxonomy, split by recovery policy.
//!
//! The processing stages themselves live in `vitalwatch-pipeline`.

#![warn(missing_docs)]

pub mod error;
pub mod settings;
pub mod types;

pub use error::{PipelineError, PipelineResult};
pub use settings::{MonitorSettings, NormalRange, RangeDraft, SettingsDraft};
pub use types::{
    Alert, Classification, ParameterStatus, Reading, RiskFinding, Severity, VitalParameter,
};
