//! Latest-wins background dispatcher
//!
//! Interactive callers (re-running an operation on every keystroke, say) hand
//! requests to a [`Dispatcher`]. Each submit cancels whatever is in flight,
//! executions are serialised through a single gate, and only the newest
//! non-cancelled result ever lands in the output slot.

use crate::archive::NamedBlob;
use crate::cancel::CancellationToken;
use crate::input::InputSource;
use crate::pipeline::{OpResult, Pipeline};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Work a [`Dispatcher`] can run
#[derive(Debug)]
pub enum Request {
    Create(InputSource),
    Verify(String),
    Extract(String),
}

/// Completed result published by a [`Dispatcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Created(OpResult<String>),
    Verified(OpResult<bool>),
    Extracted(OpResult<Vec<NamedBlob>>),
}

/// A published response and the submission it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub generation: u64,
    pub response: Response,
}

struct InFlight {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct State {
    generation: u64,
    in_flight: Option<InFlight>,
}

/// Runs pipeline requests on a background thread, newest request wins
pub struct Dispatcher {
    pipeline: Arc<Pipeline>,
    state: Mutex<State>,
    gate: Arc<Mutex<()>>,
    slot: Arc<Mutex<Option<Published>>>,
}

impl Dispatcher {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            state: Mutex::new(State::default()),
            gate: Arc::new(Mutex::new(())),
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Cancel any in-flight request and start `request`
    ///
    /// Returns the generation number the eventual response will carry.
    pub fn submit(&self, request: Request) -> u64 {
        let mut state = lock(&self.state);

        if let Some(previous) = state.in_flight.take() {
            tracing::debug!(generation = state.generation, "superseding in-flight request");
            previous.token.cancel();
        }

        state.generation += 1;
        let generation = state.generation;
        let token = CancellationToken::new();

        let pipeline = Arc::clone(&self.pipeline);
        let gate = Arc::clone(&self.gate);
        let slot = Arc::clone(&self.slot);
        let job_token = token.clone();

        let handle = thread::spawn(move || {
            let _running = lock(&gate);
            if job_token.is_cancelled() {
                return;
            }

            let response = match run(&pipeline, request, &job_token) {
                Some(response) => response,
                None => return,
            };

            let mut slot = lock(&slot);
            let newer_published = slot.as_ref().is_some_and(|p| p.generation > generation);
            if job_token.is_cancelled() || newer_published {
                return;
            }
            *slot = Some(Published {
                generation,
                response,
            });
        });

        state.in_flight = Some(InFlight { token, handle });
        generation
    }

    /// Cancel the in-flight request without starting another
    pub fn cancel(&self) {
        if let Some(in_flight) = lock(&self.state).in_flight.as_ref() {
            in_flight.token.cancel();
        }
    }

    /// Block until the most recently submitted request has finished
    pub fn wait(&self) {
        let in_flight = lock(&self.state).in_flight.take();
        if let Some(in_flight) = in_flight {
            if in_flight.handle.join().is_err() {
                tracing::error!("dispatcher worker panicked");
            }
        }
    }

    /// The most recently published response, if any
    pub fn latest(&self) -> Option<Published> {
        lock(&self.slot).clone()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Pipeline::default())
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Execute one request; `None` when it was cancelled
fn run(pipeline: &Pipeline, request: Request, token: &CancellationToken) -> Option<Response> {
    let response = match request {
        Request::Create(input) => Response::Created(pipeline.create(input, token).ok()?),
        Request::Verify(text) => Response::Verified(pipeline.verify(&text, token).ok()?),
        Request::Extract(text) => Response::Extracted(pipeline.extract(&text, token).ok()?),
    };
    Some(response)
}

/// Lock ignoring poison; a panicked worker leaves nothing half-written
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
