use crate::errors::Result;
use crate::model::MachineMasterRecord;
use crate::validate::unique_machine_ids;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MasterIndex {
    records: Vec<MachineMasterRecord>,
    by_id: HashMap<String, usize>,
}

impl MasterIndex {
    pub fn from_records(records: Vec<MachineMasterRecord>) -> Result<Self> {
        unique_machine_ids(&records)?;
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.machine_id.clone(), i))
            .collect();
        Ok(Self { records, by_id })
    }

    pub fn get(&self, machine_id: &str) -> Option<&MachineMasterRecord> {
        self.by_id.get(machine_id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, machine_id: &str) -> bool {
        self.by_id.contains_key(machine_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MachineMasterRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[MachineMasterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, life: f64) -> MachineMasterRecord {
        MachineMasterRecord {
            machine_id: id.to_string(),
            plant: "Plant B".to_string(),
            production_line: "L2".to_string(),
            machine_type: "Lathe".to_string(),
            expected_life_hours: life,
        }
    }

    #[test]
    fn test_lookup_and_order() {
        let index =
            MasterIndex::from_records(vec![record("M3", 1.0), record("M1", 2.0), record("M2", 3.0)])
                .unwrap();

        let order: Vec<&str> = index.iter().map(|r| r.machine_id.as_str()).collect();
        assert_eq!(order, vec!["M3", "M1", "M2"]);
        assert_eq!(index.get("M1").unwrap().expected_life_hours, 2.0);
        assert!(index.get("M9").is_none());
        assert!(index.contains("M2"));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_duplicate_rejected() {
        assert!(MasterIndex::from_records(vec![record("M1", 1.0), record("M1", 2.0)]).is_err());
    }
}
