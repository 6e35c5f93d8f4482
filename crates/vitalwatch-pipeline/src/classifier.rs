//! Anomaly classifier: tags each parameter of a reading against its
//! configured normal range.
//!
//! Pure function of `(reading, settings)`. Boundary values are inclusive
//! on both ends, and a parameter with no configured range is tagged
//! unknown, never abnormal.

use vitalwatch_core::{Classification, MonitorSettings, ParameterStatus, Reading};

/// Classify every parameter present in `reading`.
#[must_use]
pub fn classify(reading: &Reading, settings: &MonitorSettings) -> Classification {
    reading
        .iter()
        .map(|(parameter, value)| {
            let status = match settings.range_for(parameter) {
                Some(range) if range.contains(value) => ParameterStatus::Normal,
                Some(_) => ParameterStatus::Abnormal,
                None => ParameterStatus::Unknown,
            };
            (parameter, status)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use vitalwatch_core::{NormalRange, VitalParameter};

    fn heart_rate_only_settings() -> MonitorSettings {
        let mut normal_ranges = BTreeMap::new();
        normal_ranges.insert(VitalParameter::HeartRate, NormalRange::new(60.0, 100.0));
        MonitorSettings {
            update_interval_secs: 1.0,
            normal_ranges,
        }
    }

    #[test]
    fn in_range_is_normal_boundaries_inclusive() {
        let settings = heart_rate_only_settings();
        for value in [60.0, 80.0, 100.0] {
            let reading = Reading::new().with(VitalParameter::HeartRate, value);
            let classification = classify(&reading, &settings);
            assert_eq!(
                classification[&VitalParameter::HeartRate],
                ParameterStatus::Normal,
                "value {value} should be normal"
            );
        }
    }

    #[test]
    fn out_of_range_is_abnormal() {
        let settings = heart_rate_only_settings();
        for value in [59.9, 100.1, 0.0, 250.0] {
            let reading = Reading::new().with(VitalParameter::HeartRate, value);
            let classification = classify(&reading, &settings);
            assert_eq!(
                classification[&VitalParameter::HeartRate],
                ParameterStatus::Abnormal,
                "value {value} should be abnormal"
            );
        }
    }

    #[test]
    fn unconfigured_parameter_is_unknown_not_abnormal() {
        let settings = heart_rate_only_settings();
        let reading = Reading::new().with(VitalParameter::Spo2, 0.0);
        let classification = classify(&reading, &settings);
        assert_eq!(
            classification[&VitalParameter::Spo2],
            ParameterStatus::Unknown
        );
        assert!(!classification[&VitalParameter::Spo2].is_abnormal());
    }

    #[test]
    fn one_tag_per_present_parameter() {
        let settings = MonitorSettings::default();
        let reading = Reading::new()
            .with(VitalParameter::HeartRate, 72.0)
            .with(VitalParameter::Spo2, 85.0);
        let classification = classify(&reading, &settings);
        assert_eq!(classification.len(), 2);
        assert_eq!(
            classification[&VitalParameter::HeartRate],
            ParameterStatus::Normal
        );
        assert_eq!(
            classification[&VitalParameter::Spo2],
            ParameterStatus::Abnormal
        );
    }
}
