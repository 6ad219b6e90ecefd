use crate::errors::{Error, Result};
use crate::loader::{CsvSource, TableName, TableSource};
use crate::metrics::CACHE_HITS_TOTAL;
use crate::model::{MachineMasterRecord, Table, TelemetrySample};
use std::fs;
use std::sync::Mutex;
use std::time::SystemTime;
use tracing::debug;

struct Entry<T> {
    modified: SystemTime,
    len: u64,
    value: T,
}

type Slot<T> = Mutex<Option<Entry<T>>>;

/// Wraps a [`CsvSource`] and re-reads a table only when its file
/// modification time or size changes.
pub struct CachedSource {
    inner: CsvSource,
    samples: Slot<Vec<TelemetrySample>>,
    master: Slot<Vec<MachineMasterRecord>>,
    plants: Slot<Table>,
}

impl CachedSource {
    pub fn new(inner: CsvSource) -> Self {
        Self {
            inner,
            samples: Mutex::new(None),
            master: Mutex::new(None),
            plants: Mutex::new(None),
        }
    }

    fn cached<T: Clone>(
        &self,
        slot: &Slot<T>,
        table: TableName,
        load: impl FnOnce(&CsvSource) -> Result<T>,
    ) -> Result<T> {
        let (modified, len) = fs::metadata(self.inner.path(table))
            .and_then(|meta| Ok((meta.modified()?, meta.len())))
            .map_err(|e| Error::source_unavailable(table.file_name(), e.to_string()))?;

        let mut guard = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(entry) = guard.as_ref() {
            if entry.modified == modified && entry.len == len {
                CACHE_HITS_TOTAL.inc();
                return Ok(entry.value.clone());
            }
        }

        debug!("Reloading {}", table.file_name());
        let value = load(&self.inner)?;
        *guard = Some(Entry {
            modified,
            len,
            value: value.clone(),
        });
        Ok(value)
    }
}

impl TableSource for CachedSource {
    fn load_samples(&self) -> Result<Vec<TelemetrySample>> {
        self.cached(&self.samples, TableName::MachinesData, |src| {
            src.load_samples()
        })
    }

    fn load_master(&self) -> Result<Vec<MachineMasterRecord>> {
        self.cached(&self.master, TableName::MachinesMaster, |src| {
            src.load_master()
        })
    }

    fn load_plants(&self) -> Result<Table> {
        self.cached(&self.plants, TableName::PlantsSummary, |src| {
            src.load_plants()
        })
    }
}
