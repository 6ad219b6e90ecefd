use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Source {table} unavailable: {reason}")]
    SourceUnavailable { table: &'static str, reason: String },

    #[error("Machine not found: {0}")]
    MachineNotFound(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn source_unavailable(table: &'static str, reason: impl Into<String>) -> Self {
        Error::SourceUnavailable {
            table,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
