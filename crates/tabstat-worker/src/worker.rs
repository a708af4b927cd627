//! Isolated worker threads and batch execution
//!
//! A [`Worker`] owns a dispatcher on its own thread and talks to the caller
//! only through channels: one job in, exactly one response out. A
//! [`WorkerPool`] runs a batch of independent requests and returns the
//! responses keyed by variable name, never by completion order.

use crate::config::WorkerConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Result, WorkerError};
use crate::protocol::{Request, Response};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use tracing::{debug, trace, warn};

static NEXT_WORKER_ID: AtomicUsize = AtomicUsize::new(0);

enum Payload {
    Parsed(Request),
    Raw(String),
}

struct Job {
    payload: Payload,
    reply: Sender<Response>,
}

/// A response that has not arrived yet
///
/// Dropping it abandons the request; the worker still finishes the job.
#[derive(Debug)]
pub struct Pending {
    variable_name: String,
    receiver: Receiver<Response>,
}

impl Pending {
    /// Block until the worker answers
    pub fn wait(self) -> Result<Response> {
        self.receiver.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Like [`Pending::wait`], but a lost worker becomes an error response
    pub fn wait_response(self) -> Response {
        let name = self.variable_name.clone();
        self.wait().unwrap_or_else(|e| Response::error(name, e))
    }

    /// Response if it is already available
    pub fn try_response(&self) -> Option<Response> {
        self.receiver.try_recv().ok()
    }
}

/// A dispatcher running on a dedicated thread
#[derive(Debug)]
pub struct Worker {
    id: usize,
    sender: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn(config: &WorkerConfig) -> Result<Self> {
        config.validate()?;
        let id = NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed);
        let (sender, jobs) = mpsc::channel::<Job>();
        let handle = config
            .thread_builder(format!("tabstat-worker-{id}"))
            .spawn(move || {
                let dispatcher = Dispatcher::new();
                for job in jobs {
                    let response = match job.payload {
                        Payload::Parsed(request) => dispatcher.dispatch(&request),
                        Payload::Raw(message) => dispatcher.handle_message(&message),
                    };
                    // the caller may have dropped its pending handle
                    let _ = job.reply.send(response);
                }
                trace!(worker = id, "job channel closed");
            })?;
        debug!(worker = id, "worker started");
        Ok(Self {
            id,
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    fn send(&self, variable_name: String, payload: Payload) -> Result<Pending> {
        let (reply, receiver) = mpsc::channel();
        let sender = self.sender.as_ref().ok_or(WorkerError::Disconnected)?;
        sender
            .send(Job { payload, reply })
            .map_err(|_| WorkerError::Disconnected)?;
        Ok(Pending {
            variable_name,
            receiver,
        })
    }

    pub fn submit(&self, request: Request) -> Result<Pending> {
        self.send(request.variable_name(), Payload::Parsed(request))
    }

    /// Queue an unparsed JSON message
    pub fn submit_message(&self, message: impl Into<String>) -> Result<Pending> {
        self.send(String::new(), Payload::Raw(message.into()))
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(worker = self.id, "worker thread panicked");
            }
        }
    }
}

/// Runs batches of independent requests
#[derive(Debug, Clone)]
pub struct WorkerPool {
    config: WorkerConfig,
    #[cfg(feature = "parallel")]
    pool: Option<std::sync::Arc<rayon::ThreadPool>>,
}

impl WorkerPool {
    pub fn new(config: WorkerConfig) -> Result<Self> {
        config.validate()?;
        #[cfg(feature = "parallel")]
        let pool = match config.threads {
            0 => None,
            n => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .stack_size(config.stack_size)
                    .thread_name(|i| format!("tabstat-pool-{i}"))
                    .build()
                    .map_err(|e| WorkerError::Pool(format!("Failed to create thread pool: {e}")))?;
                Some(std::sync::Arc::new(pool))
            }
        };
        Ok(Self {
            config,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Compute every request and key the responses by variable name
    ///
    /// Requests sharing a name keep the response of the last one.
    pub fn run_all(&self, requests: Vec<Request>) -> BTreeMap<String, Response> {
        let responses = self.execute(requests);
        let mut keyed = BTreeMap::new();
        for response in responses {
            let name = response.variable_name().to_string();
            if keyed.insert(name.clone(), response).is_some() {
                warn!(variable = %name, "duplicate variable name in batch");
            }
        }
        keyed
    }

    #[cfg(feature = "parallel")]
    fn execute(&self, requests: Vec<Request>) -> Vec<Response> {
        use rayon::prelude::*;

        let run = || -> Vec<Response> {
            requests
                .par_iter()
                .map_init(Dispatcher::new, |dispatcher, request| dispatcher.dispatch(request))
                .collect()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn execute(&self, requests: Vec<Request>) -> Vec<Response> {
        let names: Vec<String> = requests.iter().map(Request::variable_name).collect();
        let worker = match Worker::spawn(&self.config) {
            Ok(worker) => worker,
            Err(e) => {
                warn!(error = %e, "worker unavailable");
                let message = e.to_string();
                return names.into_iter().map(|n| Response::error(n, &message)).collect();
            }
        };
        let pending: Vec<Result<Pending>> = requests.into_iter().map(|r| worker.submit(r)).collect();
        pending
            .into_iter()
            .zip(names)
            .map(|(p, name)| match p {
                Ok(p) => p.wait_response(),
                Err(e) => Response::error(name, e),
            })
            .collect()
    }
}
