use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

const DOWN: &str = "Down";

/// Status reported by a telemetry sample. Only `Down` carries meaning for
/// the engine; every other value is passed through as reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MachineStatus {
    Down,
    Reported(String),
}

impl MachineStatus {
    pub fn is_down(&self) -> bool {
        matches!(self, MachineStatus::Down)
    }

    pub fn as_str(&self) -> &str {
        match self {
            MachineStatus::Down => DOWN,
            MachineStatus::Reported(status) => status,
        }
    }
}

impl From<String> for MachineStatus {
    fn from(status: String) -> Self {
        if status == DOWN {
            MachineStatus::Down
        } else {
            MachineStatus::Reported(status)
        }
    }
}

impl From<&str> for MachineStatus {
    fn from(status: &str) -> Self {
        MachineStatus::from(status.to_string())
    }
}

impl From<MachineStatus> for String {
    fn from(status: MachineStatus) -> Self {
        match status {
            MachineStatus::Down => DOWN.to_string(),
            MachineStatus::Reported(status) => status,
        }
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineMasterRecord {
    pub machine_id: String,
    pub plant: String,
    pub production_line: String,
    pub machine_type: String,
    pub expected_life_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub machine_id: String,
    #[serde(with = "crate::timestamp")]
    pub timestamp: NaiveDateTime,
    pub status: MachineStatus,
    pub uptime_seconds: f64,
    pub total_runtime_hours: f64,
    pub production_line: String,
    pub plant: String,
    pub machine_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineSnapshot {
    pub machine_id: String,
    pub plant: String,
    pub production_line: String,
    pub machine_type: String,
    pub current_status: MachineStatus,
    // Window length is configurable and reported as `FleetView::window_hours`,
    // so the field is not named after the 24h default.
    pub uptime_pct: f64,
    pub total_runtime_hours: f64,
    pub expected_life_hours: f64,
    pub remaining_life_hours: f64,
    #[serde(serialize_with = "crate::timestamp::option::serialize")]
    pub last_downtime: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetView {
    #[serde(serialize_with = "crate::timestamp::option::serialize")]
    pub now: Option<NaiveDateTime>,
    pub window_hours: i64,
    pub machines: Vec<MachineSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub timestamps: Vec<String>,
    pub running: Vec<u8>,
    pub runtime_hours: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineDetail {
    pub machine_id: String,
    pub plant: String,
    pub production_line: String,
    pub machine_type: String,
    pub current_status: MachineStatus,
    pub window_hours: i64,
    pub uptime_pct: f64,
    pub total_runtime_hours: f64,
    pub expected_life_hours: f64,
    pub remaining_life_hours: f64,
    #[serde(serialize_with = "crate::timestamp::option::serialize")]
    pub last_downtime: Option<NaiveDateTime>,
    pub chart: ChartSeries,
    /// Most recent samples, newest first
    pub events: Vec<TelemetrySample>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Integer(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Cell {
    /// Types a raw CSV field. Only the `timestamp` column is read as a time;
    /// an unparsable value there yields `None`.
    pub fn parse(column: &str, raw: &str) -> Option<Cell> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(Cell::Empty);
        }
        if column == "timestamp" {
            return crate::timestamp::parse(raw).map(Cell::Timestamp);
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Some(Cell::Integer(n));
        }
        if let Ok(x) = raw.parse::<f64>() {
            return Some(Cell::Float(x));
        }
        Some(Cell::Text(raw.to_string()))
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_none(),
            Cell::Integer(n) => serializer.serialize_i64(*n),
            Cell::Float(x) => serializer.serialize_f64(*x),
            Cell::Timestamp(ts) => crate::timestamp::serialize(ts, serializer),
            Cell::Text(s) => serializer.serialize_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}
