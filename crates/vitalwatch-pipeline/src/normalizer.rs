//! Reading normalizer: fills absent parameters with clinically-neutral
//! defaults so downstream stages always see a complete reading.
//!
//! Pure and deterministic; never rejects a reading. Values already present
//! pass through unchanged, so normalization is idempotent on complete
//! input.

use vitalwatch_core::{Reading, VitalParameter};

/// Neutral default per parameter: a resting adult's textbook values.
const NEUTRAL_HEART_RATE: f64 = 80.0; // bpm
const NEUTRAL_SYSTOLIC: f64 = 120.0; // mmHg
const NEUTRAL_DIASTOLIC: f64 = 80.0; // mmHg
const NEUTRAL_TEMPERATURE: f64 = 37.0; // °C
const NEUTRAL_RESPIRATORY: f64 = 16.0; // breaths/min
const NEUTRAL_SPO2: f64 = 98.0; // %

/// Neutral default for one parameter.
#[must_use]
pub fn neutral_default(parameter: VitalParameter) -> f64 {
    match parameter {
        VitalParameter::HeartRate => NEUTRAL_HEART_RATE,
        VitalParameter::SystolicBp => NEUTRAL_SYSTOLIC,
        VitalParameter::DiastolicBp => NEUTRAL_DIASTOLIC,
        VitalParameter::BodyTemperature => NEUTRAL_TEMPERATURE,
        VitalParameter::RespiratoryRate => NEUTRAL_RESPIRATORY,
        VitalParameter::Spo2 => NEUTRAL_SPO2,
    }
}

/// Produce a complete reading: every monitored parameter carries either
/// its original value or the neutral default.
#[must_use]
pub fn normalize(reading: &Reading) -> Reading {
    let mut normalized = reading.clone();
    for parameter in VitalParameter::ALL {
        if !normalized.contains(parameter) {
            normalized.set(parameter, neutral_default(parameter));
        }
    }
    normalized
}
