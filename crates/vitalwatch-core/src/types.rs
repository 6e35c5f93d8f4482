//! Core domain types shared by every pipeline stage.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// The closed set of biometric parameters produced by the sensor source.
///
/// The serialized form (and the form used in alert messages and the
/// settings document) is the snake_case name, e.g. `heart_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalParameter {
    /// Heart rate in beats per minute.
    HeartRate,
    /// Systolic blood pressure in mmHg.
    SystolicBp,
    /// Diastolic blood pressure in mmHg.
    DiastolicBp,
    /// Body temperature in degrees Celsius.
    BodyTemperature,
    /// Respiratory rate in breaths per minute.
    RespiratoryRate,
    /// Peripheral oxygen saturation in percent.
    Spo2,
}

impl VitalParameter {
    /// All monitored parameters, in canonical order.
    pub const ALL: [VitalParameter; 6] = [
        VitalParameter::HeartRate,
        VitalParameter::SystolicBp,
        VitalParameter::DiastolicBp,
        VitalParameter::BodyTemperature,
        VitalParameter::RespiratoryRate,
        VitalParameter::Spo2,
    ];

    /// Canonical snake_case name, as used in settings and alert text.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalParameter::HeartRate => "heart_rate",
            VitalParameter::SystolicBp => "systolic_bp",
            VitalParameter::DiastolicBp => "diastolic_bp",
            VitalParameter::BodyTemperature => "body_temperature",
            VitalParameter::RespiratoryRate => "respiratory_rate",
            VitalParameter::Spo2 => "spo2",
        }
    }

    /// Display unit for the parameter.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            VitalParameter::HeartRate => "bpm",
            VitalParameter::SystolicBp | VitalParameter::DiastolicBp => "mmHg",
            VitalParameter::BodyTemperature => "°C",
            VitalParameter::RespiratoryRate => "breaths/min",
            VitalParameter::Spo2 => "%",
        }
    }
}

impl fmt::Display for VitalParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalParameter {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                PipelineError::validation(s, "not a monitored parameter")
            })
    }
}

/// One synchronized set of biometric parameter values.
///
/// A reading is produced atomically per sensor tick and is immutable once
/// published; fields may be absent (a partial reading), which the
/// normalizer fills with neutral defaults before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reading {
    values: BTreeMap<VitalParameter, f64>,
}

impl Reading {
    /// Create an empty reading.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a parameter value.
    #[must_use]
    pub fn with(mut self, parameter: VitalParameter, value: f64) -> Self {
        self.values.insert(parameter, value);
        self
    }

    /// Insert or replace a parameter value.
    pub fn set(&mut self, parameter: VitalParameter, value: f64) {
        self.values.insert(parameter, value);
    }

    /// Value for a parameter, if present.
    #[must_use]
    pub fn get(&self, parameter: VitalParameter) -> Option<f64> {
        self.values.get(&parameter).copied()
    }

    /// Whether the reading carries a value for `parameter`.
    #[must_use]
    pub fn contains(&self, parameter: VitalParameter) -> bool {
        self.values.contains_key(&parameter)
    }

    /// Iterate over the present `(parameter, value)` pairs in canonical
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (VitalParameter, f64)> + '_ {
        self.values.iter().map(|(p, v)| (*p, *v))
    }

    /// Number of parameters present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-parameter tag relative to the configured normal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStatus {
    /// Value inside the configured range (boundaries inclusive).
    Normal,
    /// Value outside the configured range.
    Abnormal,
    /// No range configured for this parameter. Absence of configuration
    /// is not evidence of a problem.
    Unknown,
}

impl ParameterStatus {
    /// Whether this tag is `Abnormal`.
    #[must_use]
    pub fn is_abnormal(&self) -> bool {
        matches!(self, ParameterStatus::Abnormal)
    }
}

impl fmt::Display for ParameterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterStatus::Normal => "normal",
            ParameterStatus::Abnormal => "abnormal",
            ParameterStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Per-parameter classification of one reading.
pub type Classification = BTreeMap<VitalParameter, ParameterStatus>;

/// A persistent-abnormality finding for a single parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFinding {
    /// The affected parameter.
    pub parameter: VitalParameter,
    /// Human-readable finding text; findings are keyed by this text when
    /// de-duplicated across ticks.
    pub message: String,
}

impl RiskFinding {
    /// Create a finding.
    pub fn new(parameter: VitalParameter, message: impl Into<String>) -> Self {
        Self {
            parameter,
            message: message.into(),
        }
    }
}

/// Alert severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Info,
    /// A parameter left its normal range.
    Warning,
    /// Persistent abnormality or a halted sensor source.
    Critical,
}

impl Severity {
    /// Parse a severity label, coercing anything unrecognized to `Info`
    /// rather than rejecting it.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "warning" => Severity::Warning,
            "critical" => Severity::Critical,
            _ => Severity::Info,
        }
    }

    /// Uppercase label used in log lines and the live feed.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operator notification. Append-only once created: the full history
/// lives in the durable alert log, the last few in the live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert text.
    pub message: String,
    /// Severity level.
    pub severity: Severity,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// Create an alert stamped with the current time.
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self::with_timestamp(message, severity, Utc::now())
    }

    /// Create an alert with an explicit timestamp (replay and tests).
    pub fn with_timestamp(
        message: impl Into<String>,
        severity: Severity,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp,
        }
    }

    /// Durable log form: `<Y-m-d H:M:S> - <SEVERITY>: <message>`.
    #[must_use]
    pub fn log_line(&self) -> String {
        format!(
            "{} - {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.severity,
            self.message
        )
    }

    /// Live feed form: `[H:M:S] SEVERITY: message`.
    #[must_use]
    pub fn feed_line(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.severity,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parameter_names_roundtrip() {
        for p in VitalParameter::ALL {
            assert_eq!(p.as_str().parse::<VitalParameter>().unwrap(), p);
        }
    }

    #[test]
    fn unknown_parameter_name_is_rejected() {
        assert!("blood_sugar".parse::<VitalParameter>().is_err());
    }

    #[test]
    fn parameter_serializes_as_snake_case_map_key() {
        let mut map = BTreeMap::new();
        map.insert(VitalParameter::HeartRate, 72.0);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"heart_rate":72.0}"#);
    }

    #[test]
    fn reading_builder_and_access() {
        let reading = Reading::new()
            .with(VitalParameter::HeartRate, 72.0)
            .with(VitalParameter::Spo2, 98.0);
        assert_eq!(reading.len(), 2);
        assert_eq!(reading.get(VitalParameter::HeartRate), Some(72.0));
        assert_eq!(reading.get(VitalParameter::SystolicBp), None);
        assert!(reading.contains(VitalParameter::Spo2));
    }

    #[test]
    fn severity_label_coercion() {
        assert_eq!(Severity::from_label("warning"), Severity::Warning);
        assert_eq!(Severity::from_label("critical"), Severity::Critical);
        assert_eq!(Severity::from_label("info"), Severity::Info);
        // Anything unrecognized coerces to Info rather than failing.
        assert_eq!(Severity::from_label("fatal"), Severity::Info);
        assert_eq!(Severity::from_label(""), Severity::Info);
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }

    #[test]
    fn alert_log_line_format() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 5).unwrap();
        let alert = Alert::with_timestamp("heart_rate reading is abnormal: 110", Severity::Warning, ts);
        assert_eq!(
            alert.log_line(),
            "2024-03-01 14:30:05 - WARNING: heart_rate reading is abnormal: 110"
        );
    }

    #[test]
    fn alert_feed_line_format() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 5).unwrap();
        let alert = Alert::with_timestamp("all clear", Severity::Info, ts);
        assert_eq!(alert.feed_line(), "[14:30:05] INFO: all clear");
    }

    #[test]
    fn status_display() {
        assert_eq!(ParameterStatus::Normal.to_string(), "normal");
        assert_eq!(ParameterStatus::Abnormal.to_string(), "abnormal");
        assert_eq!(ParameterStatus::Unknown.to_string(), "unknown");
        assert!(ParameterStatus::Abnormal.is_abnormal());
        assert!(!ParameterStatus::Unknown.is_abnormal());
    }
}
