use crate::config::EngineConfig;
use crate::errors::{Error, Result};
use crate::loader::TableSource;
use crate::master::MasterIndex;
use crate::metrics::{FLEET_MACHINES, MACHINES_NOT_FOUND_TOTAL};
use crate::model::{FleetView, MachineDetail, MachineMasterRecord, Table};
use crate::series::TimeSeries;
use crate::snapshot::{fleet_snapshot, machine_detail};
use std::sync::Arc;
use tracing::{info, warn};

/// Per-request entry point. Every call reloads the tables it needs from the
/// source and derives all metrics from scratch.
#[derive(Clone)]
pub struct Engine {
    source: Arc<dyn TableSource>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(source: Arc<dyn TableSource>, config: EngineConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn plants(&self) -> Result<Table> {
        self.source.load_plants()
    }

    pub fn master(&self) -> Result<Vec<MachineMasterRecord>> {
        let master = MasterIndex::from_records(self.source.load_master()?)?;
        Ok(master.records().to_vec())
    }

    pub fn fleet(&self) -> Result<FleetView> {
        let series = TimeSeries::from_samples(self.source.load_samples()?);
        let master = MasterIndex::from_records(self.source.load_master()?)?;

        let fleet = fleet_snapshot(&master, &series, &self.config);
        let skipped = master.len() - fleet.machines.len();
        if skipped > 0 {
            warn!("{} master machines have no telemetry, skipped", skipped);
        }
        FLEET_MACHINES.set(fleet.machines.len() as f64);
        info!(
            "Fleet snapshot: {} machines, {}h window",
            fleet.machines.len(),
            fleet.window_hours
        );

        Ok(fleet)
    }

    pub fn machine(&self, machine_id: &str) -> Result<MachineDetail> {
        let series = TimeSeries::from_samples(self.source.load_samples()?);
        if series.samples(machine_id).is_empty() {
            MACHINES_NOT_FOUND_TOTAL.inc();
            warn!("No telemetry for machine {}", machine_id);
            return Err(Error::MachineNotFound(machine_id.to_string()));
        }
        let master = MasterIndex::from_records(self.source.load_master()?)?;

        machine_detail(&master, &series, machine_id, &self.config)
    }
}
