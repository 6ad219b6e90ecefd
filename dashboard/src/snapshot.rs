use crate::config::EngineConfig;
use crate::errors::{Error, Result};
use crate::lifecycle;
use crate::master::MasterIndex;
use crate::model::{ChartSeries, FleetView, MachineDetail, MachineSnapshot, TelemetrySample};
use crate::series::TimeSeries;
use crate::timeline;
use crate::timestamp;
use crate::window::{in_window, uptime_pct, window_uptime};

/// One snapshot per master-listed machine that has telemetry, in master
/// table order. Machines without samples are skipped.
pub fn fleet_snapshot(
    master: &MasterIndex,
    series: &TimeSeries,
    config: &EngineConfig,
) -> FleetView {
    let now = series.now();
    let machines = master
        .iter()
        .filter_map(|record| {
            let samples = series.samples(&record.machine_id);
            let latest = samples.last()?;
            let uptime_pct = window_uptime(
                samples,
                now,
                config.fleet_window(),
                config.sampling_interval_secs,
            );
            let life = lifecycle::project(
                master,
                &record.machine_id,
                latest.total_runtime_hours,
                config.default_expected_life_hours,
            );

            Some(MachineSnapshot {
                machine_id: record.machine_id.clone(),
                plant: record.plant.clone(),
                production_line: record.production_line.clone(),
                machine_type: record.machine_type.clone(),
                current_status: latest.status.clone(),
                uptime_pct,
                total_runtime_hours: life.total_runtime_hours,
                expected_life_hours: life.expected_life_hours,
                remaining_life_hours: life.remaining_life_hours,
                last_downtime: timeline::last_downtime(samples),
            })
        })
        .collect();

    FleetView {
        now,
        window_hours: config.fleet_window_hours,
        machines,
    }
}

/// Detail view for one machine. Static attributes come from its latest
/// sample; the machine does not need to be in the master table.
pub fn machine_detail(
    master: &MasterIndex,
    series: &TimeSeries,
    machine_id: &str,
    config: &EngineConfig,
) -> Result<MachineDetail> {
    let samples = series.samples(machine_id);
    let timeline = timeline::extract(samples, config.timeline_len)
        .ok_or_else(|| Error::MachineNotFound(machine_id.to_string()))?;
    let current = timeline.current;

    let windowed: &[TelemetrySample] = match series.now() {
        Some(now) => in_window(samples, now, config.machine_window()),
        None => &[],
    };
    let life = lifecycle::project(
        master,
        machine_id,
        current.total_runtime_hours,
        config.default_expected_life_hours,
    );

    Ok(MachineDetail {
        machine_id: machine_id.to_string(),
        plant: current.plant.clone(),
        production_line: current.production_line.clone(),
        machine_type: current.machine_type.clone(),
        current_status: current.status.clone(),
        window_hours: config.machine_window_hours,
        uptime_pct: uptime_pct(windowed, config.sampling_interval_secs),
        total_runtime_hours: life.total_runtime_hours,
        expected_life_hours: life.expected_life_hours,
        remaining_life_hours: life.remaining_life_hours,
        last_downtime: timeline.last_downtime,
        chart: chart_series(windowed),
        events: timeline.recent,
    })
}

pub fn chart_series(samples: &[TelemetrySample]) -> ChartSeries {
    ChartSeries {
        timestamps: samples.iter().map(|s| timestamp::format(&s.timestamp)).collect(),
        running: samples
            .iter()
            .map(|s| u8::from(s.uptime_seconds > 0.0))
            .collect(),
        runtime_hours: samples.iter().map(|s| s.total_runtime_hours).collect(),
    }
}
