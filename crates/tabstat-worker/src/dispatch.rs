//! Routing of requests to calculators
//!
//! The dispatcher never performs statistics itself and never lets a failure
//! escape: parse errors, engine errors and panics all come back as
//! `status: "error"` responses.

use crate::error::WorkerError;
use crate::protocol::{recover_variable_name, Request, Response};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use tabstat_core::{Calculator, Result, ResultBundle, ScalarPrimitives, StatPrimitives};
use tabstat_crosstabs::CrosstabsCalculator;
use tabstat_descriptive::DescriptiveCalculator;
use tabstat_examine::ExamineCalculator;
use tabstat_frequency::FrequencyCalculator;
use tracing::{debug, instrument, warn};

/// One calculator per kind, sharing a primitives backend
#[derive(Debug, Clone)]
pub struct Dispatcher<P: StatPrimitives = ScalarPrimitives> {
    frequency: FrequencyCalculator<P>,
    descriptive: DescriptiveCalculator<P>,
    examine: ExamineCalculator<P>,
    crosstabs: CrosstabsCalculator<P>,
}

impl Dispatcher<ScalarPrimitives> {
    pub fn new() -> Self {
        Self::with_primitives(ScalarPrimitives::new())
    }
}

impl Default for Dispatcher<ScalarPrimitives> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: StatPrimitives> Dispatcher<P> {
    pub fn with_primitives(primitives: P) -> Self {
        Self {
            frequency: FrequencyCalculator::new(primitives.clone()),
            descriptive: DescriptiveCalculator::new(primitives.clone()),
            examine: ExamineCalculator::new(primitives.clone()),
            crosstabs: CrosstabsCalculator::new(primitives),
        }
    }

    fn compute(&self, request: &Request) -> Result<ResultBundle> {
        match request {
            Request::Frequency(r) => self.frequency.compute(r),
            Request::Descriptive(r) => self.descriptive.compute(r),
            Request::Examine(r) => self.examine.compute(r),
            Request::Crosstabs(r) => self.crosstabs.compute(r),
        }
    }

    /// Run one parsed request
    #[instrument(skip_all, fields(kind = %request.kind()))]
    pub fn dispatch(&self, request: &Request) -> Response {
        let name = request.variable_name();
        match panic::catch_unwind(AssertUnwindSafe(|| self.compute(request))) {
            Ok(Ok(bundle)) => {
                debug!(variable = %name, tables = bundle.len(), "request complete");
                Response::success(name, bundle)
            }
            Ok(Err(e)) => {
                debug!(variable = %name, error = %e, "request rejected");
                Response::error(name, WorkerError::from(e))
            }
            Err(payload) => {
                let e = WorkerError::from_panic(payload.as_ref());
                warn!(variable = %name, error = %e, "calculator panicked");
                Response::error(name, e)
            }
        }
    }

    /// Parse and run a request already decoded as JSON
    pub fn handle_value(&self, value: Value) -> Response {
        let name = recover_variable_name(&value);
        match serde_json::from_value::<Request>(value) {
            Ok(request) => self.dispatch(&request),
            Err(e) => {
                debug!(variable = %name, error = %e, "malformed request");
                Response::error(name, WorkerError::Malformed(e))
            }
        }
    }

    /// Parse and run one JSON message
    pub fn handle_message(&self, message: &str) -> Response {
        match serde_json::from_str::<Value>(message) {
            Ok(value) => self.handle_value(value),
            Err(e) => Response::error("", WorkerError::Malformed(e)),
        }
    }
}
