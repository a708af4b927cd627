//! Error types for request dispatch and worker management

use thiserror::Error;

/// Failures outside the statistics themselves
#[derive(Error, Debug)]
pub enum WorkerError {
    /// The request could not be parsed
    #[error("Malformed request: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A calculator rejected its input
    #[error(transparent)]
    Engine(#[from] tabstat_core::Error),

    /// A calculator panicked; the panic was contained at the worker boundary
    #[error("Internal error: calculator panicked: {0}")]
    Panic(String),

    /// The worker thread went away before answering
    #[error("Worker disconnected before responding")]
    Disconnected,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Thread pool error: {0}")]
    Pool(String),

    #[error("Invalid worker configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WorkerError>;

impl WorkerError {
    /// Describe a panic payload caught by `catch_unwind`
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panic(message)
    }
}
