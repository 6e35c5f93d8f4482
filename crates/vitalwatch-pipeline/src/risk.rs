//! Risk predictor: flags *persistent* abnormality, not instantaneous
//! spikes.
//!
//! Each parameter keeps a bounded FIFO window of its most recent
//! classifications. A finding is emitted only when the window is full and
//! every entry in it is abnormal; a single normal (or unknown) entry
//! clears the finding on the next update. De-duplication of findings
//! across ticks is the orchestrator's job.

use std::collections::{BTreeMap, VecDeque};

use vitalwatch_core::{Classification, ParameterStatus, RiskFinding, VitalParameter};

/// Number of recent classifications retained per parameter.
pub const HISTORY_WINDOW: usize = 5;

/// Per-parameter sliding-window persistence detector.
#[derive(Debug, Default)]
pub struct RiskPredictor {
    windows: BTreeMap<VitalParameter, VecDeque<ParameterStatus>>,
}

impl RiskPredictor {
    /// Create a predictor with empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classification and return the currently active findings.
    ///
    /// Findings are recomputed from scratch each call: a parameter whose
    /// window is entirely abnormal yields exactly one finding, in
    /// canonical parameter order.
    pub fn update(&mut self, classification: &Classification) -> Vec<RiskFinding> {
        for (&parameter, &status) in classification {
            let window = self.windows.entry(parameter).or_default();
            window.push_back(status);
            if window.len() > HISTORY_WINDOW {
                window.pop_front();
            }
        }

        self.windows
            .iter()
            .filter(|(_, window)| {
                window.len() == HISTORY_WINDOW && window.iter().all(ParameterStatus::is_abnormal)
            })
            .map(|(&parameter, _)| {
                RiskFinding::new(
                    parameter,
                    format!(
                        "Persistent abnormal {parameter} over last {HISTORY_WINDOW} readings."
                    ),
                )
            })
            .collect()
    }

    /// Length of one parameter's window (testing and diagnostics).
    #[must_use]
    pub fn window_len(&self, parameter: VitalParameter) -> usize {
        self.windows.get(&parameter).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification_of(status: ParameterStatus) -> Classification {
        let mut c = Classification::new();
        c.insert(VitalParameter::HeartRate, status);
        c
    }

    #[test]
    fn window_never_exceeds_capacity() {
        let mut predictor = RiskPredictor::new();
        for _ in 0..20 {
            predictor.update(&classification_of(ParameterStatus::Normal));
            assert!(predictor.window_len(VitalParameter::HeartRate) <= HISTORY_WINDOW);
        }
        assert_eq!(
            predictor.window_len(VitalParameter::HeartRate),
            HISTORY_WINDOW
        );
    }

    #[test]
    fn finding_requires_full_window_of_abnormals() {
        let mut predictor = RiskPredictor::new();
        for i in 1..=4 {
            let findings = predictor.update(&classification_of(ParameterStatus::Abnormal));
            assert!(findings.is_empty(), "no finding after {i} abnormals");
        }
        let findings = predictor.update(&classification_of(ParameterStatus::Abnormal));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].parameter, VitalParameter::HeartRate);
        assert_eq!(
            findings[0].message,
            "Persistent abnormal heart_rate over last 5 readings."
        );
    }

    #[test]
    fn finding_persists_while_window_stays_abnormal() {
        let mut predictor = RiskPredictor::new();
        for _ in 0..5 {
            predictor.update(&classification_of(ParameterStatus::Abnormal));
        }
        // Three more abnormal ticks: the same single finding each time.
        for _ in 0..3 {
            let findings = predictor.update(&classification_of(ParameterStatus::Abnormal));
            assert_eq!(findings.len(), 1);
        }
    }

    #[test]
    fn one_normal_entry_clears_the_finding() {
        let mut predictor = RiskPredictor::new();
        for _ in 0..5 {
            predictor.update(&classification_of(ParameterStatus::Abnormal));
        }
        let findings = predictor.update(&classification_of(ParameterStatus::Normal));
        assert!(findings.is_empty());
        // Four abnormals on top of that still leave one normal inside.
        for _ in 0..4 {
            let findings = predictor.update(&classification_of(ParameterStatus::Abnormal));
            assert!(findings.is_empty());
        }
        // The fifth pushes the normal out.
        let findings = predictor.update(&classification_of(ParameterStatus::Abnormal));
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn unknown_entries_do_not_count_as_abnormal() {
        let mut predictor = RiskPredictor::new();
        for _ in 0..5 {
            let findings = predictor.update(&classification_of(ParameterStatus::Unknown));
            assert!(findings.is_empty());
        }
    }

    #[test]
    fn parameters_are_tracked_independently() {
        let mut predictor = RiskPredictor::new();
        let mut c = Classification::new();
        c.insert(VitalParameter::HeartRate, ParameterStatus::Abnormal);
        c.insert(VitalParameter::Spo2, ParameterStatus::Normal);

        let mut findings = Vec::new();
        for _ in 0..5 {
            findings = predictor.update(&c);
        }
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].parameter, VitalParameter::HeartRate);
    }
}
