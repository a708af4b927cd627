//! Request dispatch for the tabstat calculators
//!
//! Requests arrive as JSON objects tagged by `kind` and leave as exactly one
//! response each:
//!
//! ```json
//! {"status": "success", "variableName": "grade", "results": {"tables": [...]}}
//! {"status": "error", "variableName": "grade", "error": "..."}
//! ```
//!
//! Malformed JSON, shape errors and calculator panics all become error
//! responses. [`Worker`] runs a dispatcher on its own thread behind channels;
//! [`WorkerPool`] computes batches, concurrently with the `parallel` feature.
//!
//! # Example
//!
//! ```rust
//! use tabstat_worker::handle_message;
//!
//! let response = handle_message(r#"{
//!     "kind": "descriptive",
//!     "variable": {"name": "x"},
//!     "data": [1, 2, 3, 4, 5]
//! }"#);
//! assert!(response.is_success());
//! let table = response.results().unwrap().table("Descriptive Statistics").unwrap();
//! assert_eq!(table.number(&["x"], "Mean"), Some(3.0));
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod worker;

pub use config::{WorkerConfig, DEFAULT_STACK_SIZE, THREADS_ENV};
pub use dispatch::Dispatcher;
pub use error::{Result, WorkerError};
pub use protocol::{recover_variable_name, Request, Response};
pub use worker::{Pending, Worker, WorkerPool};

/// Handle one JSON message with the scalar backend
pub fn handle_message(message: &str) -> Response {
    Dispatcher::new().handle_message(message)
}
