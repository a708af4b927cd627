//! Worker and pool configuration

use crate::error::{Result, WorkerError};
use serde::{Deserialize, Serialize};
use std::thread;

/// Overrides [`WorkerConfig::threads`]
pub const THREADS_ENV: &str = "TABSTAT_WORKER_THREADS";

/// Stack size of a worker thread
pub const DEFAULT_STACK_SIZE: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkerConfig {
    /// Concurrent requests in a batch; `0` picks one per core
    pub threads: usize,
    pub stack_size: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl WorkerConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// Defaults, with the thread count taken from the environment when set
    pub fn from_env() -> Result<Self> {
        Self::default().apply_threads(std::env::var(THREADS_ENV).ok().as_deref())
    }

    fn apply_threads(self, value: Option<&str>) -> Result<Self> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(self),
            Some(v) => v
                .parse()
                .map(|threads| self.with_threads(threads))
                .map_err(|e| WorkerError::Config(format!("{THREADS_ENV}={v}: {e}"))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.stack_size < 64 * 1024 {
            return Err(WorkerError::Config(format!(
                "stack size {} is below 64 KiB",
                self.stack_size
            )));
        }
        Ok(())
    }

    /// Builder for one named worker thread
    pub fn thread_builder(&self, name: impl Into<String>) -> thread::Builder {
        thread::Builder::new().name(name.into()).stack_size(self.stack_size)
    }
}
