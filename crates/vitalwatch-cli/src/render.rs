//! Console renderer: one status line per tick, new alerts as they arrive.

use vitalwatch_core::{ParameterStatus, VitalParameter};
use vitalwatch_pipeline::{MonitorRenderer, MonitorSnapshot};

/// Prints snapshots to stdout. Alert lines are printed once, when they
/// first enter the feed.
pub struct ConsoleRenderer {
    last_alert_total: u64,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self {
            last_alert_total: 0,
        }
    }
}

impl MonitorRenderer for ConsoleRenderer {
    fn render(&mut self, snapshot: &MonitorSnapshot) {
        if snapshot.alerts_total > self.last_alert_total {
            let new = usize::try_from(snapshot.alerts_total - self.last_alert_total)
                .unwrap_or(snapshot.alerts.len())
                .min(snapshot.alerts.len());
            for alert in snapshot.alerts.iter().skip(snapshot.alerts.len() - new) {
                println!("{}", alert.feed_line());
            }
            self.last_alert_total = snapshot.alerts_total;
        }

        println!("{}", status_line(snapshot));
    }
}

/// Compose the per-tick status line: every parameter with its unit, an
/// `!` marker on abnormal values, a `?` marker on unconfigured ones, and
/// the active risk count.
fn status_line(snapshot: &MonitorSnapshot) -> String {
    let vitals: Vec<String> = VitalParameter::ALL
        .iter()
        .filter_map(|&parameter| {
            let value = snapshot.reading.get(parameter)?;
            let marker = match snapshot.classification.get(&parameter) {
                Some(ParameterStatus::Abnormal) => " !",
                Some(ParameterStatus::Unknown) => " ?",
                _ => "",
            };
            Some(format!("{parameter} {value} {}{marker}", parameter.unit()))
        })
        .collect();

    let risks = if snapshot.risks.is_empty() {
        "none".to_string()
    } else {
        snapshot
            .risks
            .iter()
            .map(|f| f.parameter.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let source = if snapshot.source.is_halted() {
        " | source HALTED"
    } else {
        ""
    };

    format!("{} | risks: {risks}{source}", vitals.join(" | "))
}
