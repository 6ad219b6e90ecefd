use crate::errors::{Error, Result};
use crate::metrics::{SOURCE_FAILURES_TOTAL, TABLE_LOAD_SECONDS};
use crate::model::{Cell, MachineMasterRecord, Table, TelemetrySample};
use crate::validate::{require_columns, unique_machine_ids};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    MachinesData,
    MachinesMaster,
    PlantsSummary,
}

impl TableName {
    pub fn file_name(self) -> &'static str {
        match self {
            TableName::MachinesData => "machines_data.csv",
            TableName::MachinesMaster => "machines_master.csv",
            TableName::PlantsSummary => "plants_summary.csv",
        }
    }

    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            TableName::MachinesData => &[
                "machine_id",
                "timestamp",
                "status",
                "uptime_seconds",
                "total_runtime_hours",
                "production_line",
                "plant",
                "machine_type",
            ],
            TableName::MachinesMaster => &[
                "machine_id",
                "plant",
                "production_line",
                "machine_type",
                "expected_life_hours",
            ],
            TableName::PlantsSummary => &[],
        }
    }
}

/// Read access to the backing tables. Every call re-reads its table.
pub trait TableSource: Send + Sync {
    fn load_samples(&self) -> Result<Vec<TelemetrySample>>;
    fn load_master(&self) -> Result<Vec<MachineMasterRecord>>;
    fn load_plants(&self) -> Result<Table>;
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    data_dir: PathBuf,
}

impl CsvSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path(&self, table: TableName) -> PathBuf {
        self.data_dir.join(table.file_name())
    }

    fn open(&self, table: TableName) -> Result<csv::Reader<File>> {
        let path = self.path(table);
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| unavailable(table, e))?;
        let headers = reader.headers().map_err(|e| unavailable(table, e))?;
        require_columns(table, headers)?;
        Ok(reader)
    }

    fn read_records<T: DeserializeOwned>(&self, table: TableName) -> Result<Vec<T>> {
        let mut reader = self.open(table)?;
        reader
            .deserialize()
            .collect::<std::result::Result<Vec<T>, csv::Error>>()
            .map_err(|e| unavailable(table, e))
    }

    fn read_table(&self, table: TableName) -> Result<Table> {
        let mut reader = self.open(table)?;
        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| unavailable(table, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| unavailable(table, e))?;
            let row = columns
                .iter()
                .zip(record.iter())
                .map(|(column, raw)| {
                    Cell::parse(column, raw).ok_or_else(|| {
                        Error::source_unavailable(
                            table.file_name(),
                            format!("row {}: unparsable {} {:?}", line + 1, column, raw),
                        )
                    })
                })
                .collect::<Result<Vec<Cell>>>()?;
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }
}

impl TableSource for CsvSource {
    fn load_samples(&self) -> Result<Vec<TelemetrySample>> {
        timed(TableName::MachinesData, || {
            self.read_records(TableName::MachinesData)
        })
    }

    fn load_master(&self) -> Result<Vec<MachineMasterRecord>> {
        timed(TableName::MachinesMaster, || {
            let records = self.read_records(TableName::MachinesMaster)?;
            unique_machine_ids(&records)?;
            Ok(records)
        })
    }

    fn load_plants(&self) -> Result<Table> {
        timed(TableName::PlantsSummary, || {
            self.read_table(TableName::PlantsSummary)
        })
    }
}

fn unavailable(table: TableName, err: csv::Error) -> Error {
    Error::source_unavailable(table.file_name(), err.to_string())
}

fn timed<T>(table: TableName, load: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    let result = load();
    let elapsed = start.elapsed().as_secs_f64();
    TABLE_LOAD_SECONDS.observe(elapsed);

    match &result {
        Ok(_) => debug!("Loaded {} in {:.3}s", table.file_name(), elapsed),
        Err(e) => {
            SOURCE_FAILURES_TOTAL
                .with_label_values(&[table.file_name()])
                .inc();
            error!("Failed to load {}: {}", table.file_name(), e);
        }
    }

    result
}
