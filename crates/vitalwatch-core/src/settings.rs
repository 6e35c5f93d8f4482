//! Settings store: the persisted monitoring configuration and its
//! numeric-validated editor boundary.
//!
//! The on-disk document is JSON:
//!
//! ```json
//! {
//!   "update_interval": 1.0,
//!   "normal_ranges": {
//!     "heart_rate": [60.0, 100.0],
//!     "spo2": [95.0, 100.0]
//!   }
//! }
//! ```
//!
//! A missing or unparseable file is never fatal: [`MonitorSettings::load`]
//! falls back to the documented defaults and records why.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::types::VitalParameter;

/// Inclusive normal range for one parameter, serialized as
/// `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct NormalRange {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Inclusive upper bound.
    pub upper: f64,
}

impl NormalRange {
    /// Create a range. Bounds are taken as-is; see
    /// [`MonitorSettings::validate`] for the `lower <= upper` check.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Whether `value` lies inside the range, boundaries inclusive.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

impl From<[f64; 2]> for NormalRange {
    fn from([lower, upper]: [f64; 2]) -> Self {
        Self { lower, upper }
    }
}

impl From<NormalRange> for [f64; 2] {
    fn from(range: NormalRange) -> Self {
        [range.lower, range.upper]
    }
}

/// The monitoring configuration: sensor update cadence plus per-parameter
/// normal ranges.
///
/// Loaded once at process start, replaced atomically by the settings
/// editor, and persisted synchronously on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Sensor update interval in seconds. Must be positive.
    #[serde(rename = "update_interval")]
    pub update_interval_secs: f64,
    /// Normal range per parameter. A parameter without an entry
    /// classifies as unknown.
    pub normal_ranges: BTreeMap<VitalParameter, NormalRange>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        let mut normal_ranges = BTreeMap::new();
        normal_ranges.insert(VitalParameter::HeartRate, NormalRange::new(60.0, 100.0));
        normal_ranges.insert(VitalParameter::SystolicBp, NormalRange::new(90.0, 120.0));
        normal_ranges.insert(VitalParameter::DiastolicBp, NormalRange::new(60.0, 80.0));
        normal_ranges.insert(
            VitalParameter::BodyTemperature,
            NormalRange::new(36.1, 37.2),
        );
        normal_ranges.insert(VitalParameter::RespiratoryRate, NormalRange::new(12.0, 20.0));
        normal_ranges.insert(VitalParameter::Spo2, NormalRange::new(95.0, 100.0));

        Self {
            update_interval_secs: 1.0,
            normal_ranges,
        }
    }
}

impl MonitorSettings {
    /// Configured range for a parameter, if any.
    #[must_use]
    pub fn range_for(&self, parameter: VitalParameter) -> Option<NormalRange> {
        self.normal_ranges.get(&parameter).copied()
    }

    /// Sensor update interval as a [`Duration`].
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs_f64(self.update_interval_secs)
    }

    /// Check the structural invariants: a positive, finite update interval
    /// and `lower <= upper` for every configured range.
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.update_interval_secs.is_finite() || self.update_interval_secs <= 0.0 {
            return Err(PipelineError::config(format!(
                "update_interval must be positive, got {}",
                self.update_interval_secs
            )));
        }
        for (parameter, range) in &self.normal_ranges {
            if !range.lower.is_finite() || !range.upper.is_finite() || range.lower > range.upper {
                return Err(PipelineError::config(format!(
                    "invalid normal range for {parameter}: [{}, {}]",
                    range.lower, range.upper
                )));
            }
        }
        Ok(())
    }

    /// Load settings from `path`, falling back to defaults if the file is
    /// missing, unparseable, or violates an invariant. Never fails.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "settings file not found, using defaults");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read settings, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str::<Self>(&raw) {
            Ok(settings) => match settings.validate() {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "settings loaded");
                    settings
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "settings violate invariants, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse settings, using defaults");
                Self::default()
            }
        }
    }

    /// Persist settings to `path` as pretty-printed JSON, synchronously.
    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        self.validate()?;
        let body = serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::config(format!("failed to serialize settings: {e}")))?;
        fs::write(path, body).map_err(|e| {
            PipelineError::config(format!("failed to write {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "settings saved");
        Ok(())
    }
}

/// One editable range row in a [`SettingsDraft`].
#[derive(Debug, Clone, PartialEq)]
pub struct RangeDraft {
    /// The parameter this row configures.
    pub parameter: VitalParameter,
    /// Raw lower-bound input.
    pub lower: String,
    /// Raw upper-bound input.
    pub upper: String,
}

/// Candidate settings as raw strings from an editor.
///
/// [`SettingsDraft::validate`] numeric-parses every field and either
/// returns a complete [`MonitorSettings`] or a re-enterable
/// [`PipelineError::Validation`] naming the offending field. The active
/// settings are never touched on failure, and nothing is written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDraft {
    /// Raw update-interval input, in seconds.
    pub update_interval: String,
    /// One row per configured parameter.
    pub ranges: Vec<RangeDraft>,
}

impl SettingsDraft {
    /// Pre-fill a draft from the currently active settings.
    #[must_use]
    pub fn from_settings(settings: &MonitorSettings) -> Self {
        Self {
            update_interval: settings.update_interval_secs.to_string(),
            ranges: settings
                .normal_ranges
                .iter()
                .map(|(parameter, range)| RangeDraft {
                    parameter: *parameter,
                    lower: range.lower.to_string(),
                    upper: range.upper.to_string(),
                })
                .collect(),
        }
    }

    /// Validate the draft into a settings structure.
    pub fn validate(&self) -> PipelineResult<MonitorSettings> {
        let update_interval_secs = parse_field("update_interval", &self.update_interval)?;
        if update_interval_secs <= 0.0 {
            return Err(PipelineError::validation(
                "update_interval",
                "must be positive",
            ));
        }

        let mut normal_ranges = BTreeMap::new();
        for row in &self.ranges {
            let lower = parse_field(&format!("{}_lower", row.parameter), &row.lower)?;
            let upper = parse_field(&format!("{}_upper", row.parameter), &row.upper)?;
            if lower > upper {
                return Err(PipelineError::validation(
                    row.parameter.as_str(),
                    "lower bound exceeds upper bound",
                ));
            }
            normal_ranges.insert(row.parameter, NormalRange::new(lower, upper));
        }

        Ok(MonitorSettings {
            update_interval_secs,
            normal_ranges,
        })
    }
}

fn parse_field(field: &str, raw: &str) -> PipelineResult<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PipelineError::validation(field, format!("'{raw}' is not a number")))?;
    if !value.is_finite() {
        return Err(PipelineError::validation(field, "must be finite"));
    }
    Ok(value)
}
