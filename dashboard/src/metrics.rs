use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};

use crate::errors::Result;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("dashboard_requests_total", "Total dashboard view requests"),
        &["view"]
    )
    .expect("valid requests_total metric");
    pub static ref SOURCE_FAILURES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            "dashboard_source_failures_total",
            "Total failures reading a backing table"
        ),
        &["table"]
    )
    .expect("valid source_failures_total metric");
    pub static ref MACHINES_NOT_FOUND_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_machines_not_found_total",
        "Total lookups of machines without telemetry"
    ))
    .expect("valid machines_not_found_total metric");
    pub static ref TABLE_LOAD_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "dashboard_table_load_seconds",
            "Time taken to load and parse one backing table"
        )
        .buckets(vec![
            0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5
        ])
    )
    .expect("valid table_load_seconds metric");
    pub static ref FLEET_MACHINES: Gauge = Gauge::with_opts(Opts::new(
        "dashboard_fleet_machines",
        "Machines in the most recent fleet snapshot"
    ))
    .expect("valid fleet_machines metric");
    pub static ref CACHE_HITS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_cache_hits_total",
        "Table reads served from the modification-time cache"
    ))
    .expect("valid cache_hits_total metric");
}

pub fn init_metrics() -> Result<()> {
    REGISTRY.register(Box::new(REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SOURCE_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(MACHINES_NOT_FOUND_TOTAL.clone()))?;
    REGISTRY.register(Box::new(TABLE_LOAD_SECONDS.clone()))?;
    REGISTRY.register(Box::new(FLEET_MACHINES.clone()))?;
    REGISTRY.register(Box::new(CACHE_HITS_TOTAL.clone()))?;
    Ok(())
}

pub fn gather_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
