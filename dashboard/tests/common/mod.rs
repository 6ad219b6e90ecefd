#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const MASTER_HEADER: &str = "machine_id,plant,production_line,machine_type,expected_life_hours";
pub const DATA_HEADER: &str =
    "machine_id,timestamp,status,uptime_seconds,total_runtime_hours,production_line,plant,machine_type";

pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn ts(hours: i64) -> String {
    (t0() + Duration::hours(hours))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// A throwaway data directory, removed on drop
pub struct DataDir {
    path: PathBuf,
}

impl DataDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("dashboard-test-{}", Uuid::new_v4()));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, file: &str, header: &str, rows: &[String]) {
        let mut body = String::from(header);
        body.push('\n');
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        fs::write(self.path.join(file), body).unwrap();
    }

    pub fn remove(&self, file: &str) {
        fs::remove_file(self.path.join(file)).unwrap();
    }
}

impl Drop for DataDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Standard fixture:
/// - M1: hourly samples over 250h, always up, one `Down` at hour 100
/// - M2: hourly samples over the last 24h, up every other hour
/// - M3: in the master table, no telemetry
/// - M7: telemetry only, 12000 runtime hours
pub fn fleet_fixture() -> DataDir {
    let dir = DataDir::new();

    dir.write(
        "machines_master.csv",
        MASTER_HEADER,
        &[
            "M2,Plant A,Line 2,Lathe,30000".to_string(),
            "M1,Plant A,Line 1,Press,40000".to_string(),
            "M3,Plant B,Line 1,Robot,20000".to_string(),
        ],
    );

    let mut rows = Vec::new();
    for h in 0..=250 {
        let (status, uptime) = if h == 100 { ("Down", 0) } else { ("Running", 300) };
        rows.push(format!(
            "M1,{},{},{},{},Line 1,Plant A,Press",
            ts(h),
            status,
            uptime,
            1000 + h
        ));
    }
    for h in 227..=250 {
        let (status, uptime) = if h % 2 == 0 { ("Running", 300) } else { ("Idle", 0) };
        rows.push(format!(
            "M2,{},{},{},{},Line 2,Plant A,Lathe",
            ts(h),
            status,
            uptime,
            500 + h
        ));
    }
    rows.push(format!("M7,{},Idle,0,12000,Line 9,Plant C,Mixer", ts(250)));
    dir.write("machines_data.csv", DATA_HEADER, &rows);

    dir.write(
        "plants_summary.csv",
        "plant,machines,oee,timestamp,note",
        &[
            "Plant A,2,0.82,2024-01-11 10:00:00,".to_string(),
            "Plant B,1,0.67,2024-01-11 10:00:00,idle line".to_string(),
        ],
    );

    dir
}
