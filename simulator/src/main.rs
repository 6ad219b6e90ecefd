mod telemetry;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, Timelike, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Generates a fleet telemetry data set in the dashboard's CSV layout
#[derive(Debug, Parser)]
#[command(name = "simulator", version)]
struct Args {
    /// Output directory for the three CSV tables
    #[arg(long, env = "DATA_DIR", default_value = "./data")]
    out_dir: PathBuf,

    /// Number of plants (at most 26)
    #[arg(long, env = "PLANTS", default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=26))]
    plants: u8,

    #[arg(long, env = "MACHINES", default_value_t = 24)]
    machines: usize,

    /// Hours of history per machine
    #[arg(long, env = "HOURS", default_value_t = 250)]
    hours: u32,

    /// Nominal sampling interval in seconds
    #[arg(long, env = "INTERVAL_SECS", default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..))]
    interval_secs: u32,

    /// Timestamp of the latest sample (e.g. 2024-01-11T10:00:00); defaults
    /// to the start of the current hour
    #[arg(long, env = "END")]
    end: Option<NaiveDateTime>,

    /// Master-table machines that get no telemetry at all
    #[arg(long, env = "SILENT_MACHINES", default_value_t = 1)]
    silent_machines: usize,

    #[arg(long, env = "SEED", default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    info!("Starting fleet data simulator");
    info!(
        "Plants: {}, Machines: {}, History: {}h @ {}s, Seed: {}",
        args.plants, args.machines, args.hours, args.interval_secs, args.seed
    );

    let mut rng = StdRng::seed_from_u64(args.seed);
    let samples = (args.hours as usize * 3600) / args.interval_secs as usize + 1;
    let end = args.end.unwrap_or_else(|| {
        let now = Utc::now().naive_utc();
        now.date().and_hms_opt(now.hour(), 0, 0).unwrap_or(now)
    });
    let start = end - Duration::seconds((samples as i64 - 1) * args.interval_secs as i64);

    let master = telemetry::generate_master(&mut rng, args.plants as usize, args.machines);
    let reporting = args.machines.saturating_sub(args.silent_machines);
    let series: Vec<Vec<telemetry::TelemetryRow>> = master[..reporting]
        .iter()
        .map(|m| telemetry::generate_telemetry(&mut rng, m, start, samples, args.interval_secs))
        .collect();
    let per_day = (24 * 3600 / args.interval_secs) as usize;
    let plants =
        telemetry::summarize_plants(&master[..reporting], &series, per_day, args.interval_secs);

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    write_csv(&args.out_dir.join("machines_master.csv"), &master)?;
    write_csv(
        &args.out_dir.join("machines_data.csv"),
        series.iter().flatten(),
    )?;
    write_csv(&args.out_dir.join("plants_summary.csv"), &plants)?;

    info!(
        "Wrote {} machines, {} samples, {} plants to {}",
        master.len(),
        series.iter().map(Vec::len).sum::<usize>(),
        plants.len(),
        args.out_dir.display()
    );

    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
