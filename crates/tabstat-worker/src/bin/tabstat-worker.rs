//! Line-oriented worker process
//!
//! Reads one JSON request per stdin line and writes one JSON response per
//! stdout line. Logs go to stderr, filtered by `RUST_LOG`; set
//! `TABSTAT_LOG_FORMAT=json` for structured log lines.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use tabstat_worker::{Worker, WorkerConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_FORMAT_ENV: &str = "TABSTAT_LOG_FORMAT";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr);
    if std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    init_logging();
    let config = WorkerConfig::from_env().context("reading worker configuration")?;
    let worker = Worker::spawn(&config).context("starting worker thread")?;
    info!(worker = worker.id(), "ready");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut handled = 0usize;
    for line in stdin.lock().lines() {
        let line = line.context("reading request line")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = worker.submit_message(line)?.wait_response();
        serde_json::to_writer(&mut out, &response).context("writing response")?;
        out.write_all(b"\n")?;
        out.flush()?;
        handled += 1;
    }
    debug!(handled, "input closed");
    Ok(())
}
