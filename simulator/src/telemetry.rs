use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use serde::Serialize;

const MACHINE_TYPES: &[&str] = &["Press", "Lathe", "CNC Mill", "Robot Arm", "Conveyor"];

/// Row of `machines_master.csv`
#[derive(Debug, Clone, Serialize)]
pub struct MasterRow {
    pub machine_id: String,
    pub plant: String,
    pub production_line: String,
    pub machine_type: String,
    pub expected_life_hours: f64,
}

/// Row of `machines_data.csv`
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRow {
    pub machine_id: String,
    pub timestamp: String,
    pub status: &'static str,
    pub uptime_seconds: u32,
    pub total_runtime_hours: f64,
    pub production_line: String,
    pub plant: String,
    pub machine_type: String,
}

/// Row of `plants_summary.csv`
#[derive(Debug, Clone, Serialize)]
pub struct PlantRow {
    pub plant: String,
    pub machines: usize,
    pub lines: usize,
    pub avg_uptime_pct: f64,
    pub machines_down: usize,
}

pub fn generate_master(rng: &mut impl Rng, plants: usize, machines: usize) -> Vec<MasterRow> {
    (0..machines)
        .map(|i| {
            let plant = i % plants;
            MasterRow {
                machine_id: format!("M{:03}", i + 1),
                plant: format!("Plant {}", (b'A' + plant as u8) as char),
                production_line: format!("Line {}", (i / plants) % 3 + 1),
                machine_type: MACHINE_TYPES[rng.gen_range(0..MACHINE_TYPES.len())].to_string(),
                expected_life_hours: (rng.gen_range(30..=80) * 1000) as f64,
            }
        })
        .collect()
}

/// Simulates one machine as a small Running/Idle/Down state machine sampled
/// every `interval_secs`.
pub fn generate_telemetry(
    rng: &mut impl Rng,
    machine: &MasterRow,
    start: NaiveDateTime,
    samples: usize,
    interval_secs: u32,
) -> Vec<TelemetryRow> {
    let mut runtime_hours = rng.gen_range(0.0..machine.expected_life_hours * 1.1);
    let mut status = "Running";

    (0..samples)
        .map(|n| {
            status = next_status(rng, status);
            let uptime_seconds = match status {
                "Running" => interval_secs,
                "Idle" => rng.gen_range(0..=interval_secs / 2),
                _ => 0,
            };
            runtime_hours += uptime_seconds as f64 / 3600.0;

            TelemetryRow {
                machine_id: machine.machine_id.clone(),
                timestamp: (start + Duration::seconds(n as i64 * interval_secs as i64))
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                status,
                uptime_seconds,
                total_runtime_hours: (runtime_hours * 100.0).round() / 100.0,
                production_line: machine.production_line.clone(),
                plant: machine.plant.clone(),
                machine_type: machine.machine_type.clone(),
            }
        })
        .collect()
}

fn next_status(rng: &mut impl Rng, current: &'static str) -> &'static str {
    let roll: f64 = rng.gen();
    match current {
        "Running" if roll < 0.01 => "Down",
        "Running" if roll < 0.05 => "Idle",
        "Idle" if roll < 0.30 => "Running",
        "Down" if roll < 0.15 => "Running",
        other => other,
    }
}

/// Per-plant rollup over each machine's last `tail` samples
pub fn summarize_plants(
    master: &[MasterRow],
    telemetry: &[Vec<TelemetryRow>],
    tail: usize,
    interval_secs: u32,
) -> Vec<PlantRow> {
    let mut plants: Vec<PlantRow> = Vec::new();

    for (machine, rows) in master.iter().zip(telemetry) {
        let recent = &rows[rows.len().saturating_sub(tail)..];
        let uptime: u32 = recent.iter().map(|r| r.uptime_seconds).sum();
        let pct = if recent.is_empty() {
            0.0
        } else {
            uptime as f64 / (recent.len() as f64 * interval_secs as f64) * 100.0
        };
        let down = rows.last().is_some_and(|r| r.status == "Down");

        let idx = match plants.iter().position(|p| p.plant == machine.plant) {
            Some(idx) => idx,
            None => {
                plants.push(PlantRow {
                    plant: machine.plant.clone(),
                    machines: 0,
                    lines: 0,
                    avg_uptime_pct: 0.0,
                    machines_down: 0,
                });
                plants.len() - 1
            }
        };
        let plant = &mut plants[idx];
        // running sum, averaged below
        plant.avg_uptime_pct += pct;
        plant.machines += 1;
        plant.machines_down += usize::from(down);
    }

    for plant in &mut plants {
        let mut lines: Vec<&str> = master
            .iter()
            .filter(|m| m.plant == plant.plant)
            .map(|m| m.production_line.as_str())
            .collect();
        lines.sort_unstable();
        lines.dedup();
        plant.lines = lines.len();
        let avg = plant.avg_uptime_pct / plant.machines as f64;
        plant.avg_uptime_pct = (avg * 100.0).round() / 100.0;
    }

    plants
}
