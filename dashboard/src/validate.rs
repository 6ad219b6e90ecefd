use crate::errors::{Error, Result};
use crate::loader::TableName;
use crate::model::MachineMasterRecord;
use csv::StringRecord;
use std::collections::HashSet;

/// Checks that every column the engine reads is present in the header row.
/// Extra columns are allowed.
pub fn require_columns(table: TableName, headers: &StringRecord) -> Result<()> {
    let present: HashSet<&str> = headers.iter().map(str::trim).collect();
    let missing: Vec<&str> = table
        .required_columns()
        .iter()
        .copied()
        .filter(|column| !present.contains(column))
        .collect();

    if !missing.is_empty() {
        return Err(Error::source_unavailable(
            table.file_name(),
            format!("missing required columns: {}", missing.join(", ")),
        ));
    }

    Ok(())
}

pub fn unique_machine_ids(records: &[MachineMasterRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if record.machine_id.is_empty() {
            return Err(Error::source_unavailable(
                TableName::MachinesMaster.file_name(),
                "empty machine_id",
            ));
        }
        if !seen.insert(record.machine_id.as_str()) {
            return Err(Error::source_unavailable(
                TableName::MachinesMaster.file_name(),
                format!("duplicate machine_id {}", record.machine_id),
            ));
        }
    }

    Ok(())
}
