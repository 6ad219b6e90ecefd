use crate::master::MasterIndex;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LifeProjection {
    pub expected_life_hours: f64,
    pub total_runtime_hours: f64,
    pub remaining_life_hours: f64,
}

/// Projects remaining life from the latest cumulative runtime. Machines
/// missing from the master table get `default_expected_life_hours`.
/// Negative remaining life is valid output.
pub fn project(
    master: &MasterIndex,
    machine_id: &str,
    total_runtime_hours: f64,
    default_expected_life_hours: f64,
) -> LifeProjection {
    let expected_life_hours = match master.get(machine_id) {
        Some(record) => record.expected_life_hours,
        None => {
            debug!(
                "Machine {} not in master table, assuming {} expected life hours",
                machine_id, default_expected_life_hours
            );
            default_expected_life_hours
        }
    };

    LifeProjection {
        expected_life_hours,
        total_runtime_hours,
        remaining_life_hours: expected_life_hours - total_runtime_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MachineMasterRecord;

    fn master() -> MasterIndex {
        MasterIndex::from_records(vec![MachineMasterRecord {
            machine_id: "M1".to_string(),
            plant: "Plant A".to_string(),
            production_line: "L1".to_string(),
            machine_type: "Press".to_string(),
            expected_life_hours: 30000.0,
        }])
        .unwrap()
    }

    #[test]
    fn test_known_machine() {
        let life = project(&master(), "M1", 1250.5, 50000.0);

        assert_eq!(life.expected_life_hours, 30000.0);
        assert_eq!(life.remaining_life_hours, 28749.5);
    }

    #[test]
    fn test_unknown_machine_uses_default() {
        let life = project(&master(), "M7", 12000.0, 50000.0);

        assert_eq!(life.expected_life_hours, 50000.0);
        assert_eq!(life.remaining_life_hours, 38000.0);
    }

    #[test]
    fn test_exceeded_life_is_negative() {
        let life = project(&master(), "M1", 31000.0, 50000.0);

        assert_eq!(life.remaining_life_hours, -1000.0);
    }
}
