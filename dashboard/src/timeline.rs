use crate::model::TelemetrySample;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<'a> {
    pub current: &'a TelemetrySample,
    pub last_downtime: Option<NaiveDateTime>,
    /// Newest first
    pub recent: Vec<TelemetrySample>,
}

/// Builds the timeline from chronological samples; `None` if there are none.
pub fn extract(samples: &[TelemetrySample], limit: usize) -> Option<Timeline<'_>> {
    let current = samples.last()?;
    Some(Timeline {
        current,
        last_downtime: last_downtime(samples),
        recent: recent_events(samples, limit),
    })
}

pub fn last_downtime(samples: &[TelemetrySample]) -> Option<NaiveDateTime> {
    samples
        .iter()
        .filter(|s| s.status.is_down())
        .map(|s| s.timestamp)
        .max()
}

pub fn recent_events(samples: &[TelemetrySample], limit: usize) -> Vec<TelemetrySample> {
    let start = samples.len().saturating_sub(limit);
    samples[start..].iter().rev().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MachineStatus;
    use chrono::{Duration, NaiveDate};

    fn at(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(minutes)
    }

    fn samples(statuses: &[&str]) -> Vec<TelemetrySample> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| TelemetrySample {
                machine_id: "M1".to_string(),
                timestamp: at(i as i64 * 5),
                status: MachineStatus::from(*status),
                uptime_seconds: if *status == "Down" { 0.0 } else { 300.0 },
                total_runtime_hours: i as f64,
                production_line: "L1".to_string(),
                plant: "Plant A".to_string(),
                machine_type: "Press".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_last_downtime() {
        let samples = samples(&["Running", "Down", "Running", "Down", "Idle"]);

        assert_eq!(last_downtime(&samples), Some(at(15)));
    }

    #[test]
    fn test_never_down() {
        let samples = samples(&["Running", "Idle", "Running"]);

        assert_eq!(last_downtime(&samples), None);
    }

    #[test]
    fn test_recent_events_capped_newest_first() {
        let statuses = vec!["Running"; 30];
        let samples = samples(&statuses);

        let recent = recent_events(&samples, 20);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].timestamp, at(29 * 5));
        assert_eq!(recent[19].timestamp, at(10 * 5));
    }

    #[test]
    fn test_recent_events_keeps_repeats() {
        let samples = samples(&["Down", "Down", "Down"]);

        let recent = recent_events(&samples, 20);
        assert_eq!(recent.len(), 3);
        assert!(recent.iter().all(|s| s.status.is_down()));
    }

    #[test]
    fn test_extract() {
        let samples = samples(&["Running", "Down", "Idle"]);

        let timeline = extract(&samples, 2).unwrap();
        assert_eq!(timeline.current.status.as_str(), "Idle");
        assert_eq!(timeline.last_downtime, Some(at(5)));
        assert_eq!(timeline.recent.len(), 2);
        assert!(extract(&[], 20).is_none());
    }
}
