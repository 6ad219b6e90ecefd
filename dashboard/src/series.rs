use crate::model::TelemetrySample;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Telemetry grouped per machine, each group sorted by timestamp.
///
/// `now` is the latest timestamp across all machines, so every machine is
/// measured against the same window boundary.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    by_machine: HashMap<String, Vec<TelemetrySample>>,
    now: Option<NaiveDateTime>,
}

impl TimeSeries {
    pub fn from_samples(samples: Vec<TelemetrySample>) -> Self {
        let now = samples.iter().map(|s| s.timestamp).max();

        let mut by_machine: HashMap<String, Vec<TelemetrySample>> = HashMap::new();
        for sample in samples {
            by_machine
                .entry(sample.machine_id.clone())
                .or_default()
                .push(sample);
        }
        // Stable: ties keep file order, so the later row wins as "latest".
        for samples in by_machine.values_mut() {
            samples.sort_by_key(|s| s.timestamp);
        }

        Self { by_machine, now }
    }

    pub fn now(&self) -> Option<NaiveDateTime> {
        self.now
    }

    pub fn samples(&self, machine_id: &str) -> &[TelemetrySample] {
        self.by_machine
            .get(machine_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn latest(&self, machine_id: &str) -> Option<&TelemetrySample> {
        self.samples(machine_id).last()
    }

    pub fn machine_count(&self) -> usize {
        self.by_machine.len()
    }
}
