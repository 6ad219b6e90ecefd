//! Fleet telemetry dashboard: derives uptime, lifecycle and timeline views
//! for industrial machines from CSV telemetry and a machine master table.

pub mod cache;
pub mod config;
pub mod engine;
pub mod errors;
pub mod lifecycle;
pub mod loader;
pub mod master;
pub mod metrics;
pub mod model;
pub mod rest;
pub mod series;
pub mod snapshot;
pub mod timeline;
pub mod timestamp;
pub mod validate;
pub mod window;

pub use config::{Config, EngineConfig};
pub use engine::Engine;
pub use errors::{Error, Result};
pub use loader::{CsvSource, TableName, TableSource};
