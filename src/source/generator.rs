//! Single-flight background entry generator.
//!
//! Computes a contiguous run of [`Entry`] values on a dedicated worker
//! thread and hands the finished [`Batch`] back over a channel of capacity 1.
//! The interactive context drains it with [`Generator::poll`].
//!
//! # Single flight
//!
//! At most one job is outstanding. The busy token is the in-flight job: its
//! worker's `JoinHandle` plus the receiving end of a channel made for that job
//! alone. It is taken in [`Generator::start`] and released once the batch has
//! been received, once the worker is found dead without delivering, or once
//! the worker has been joined by [`Generator::idle`]. `start` while busy is a
//! silent no-op.

use super::{Batch, Direction, GenerationRequest, MIN_VALUE};
use crate::model::Entry;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error};

/// Name given to worker threads.
const THREAD_NAME: &str = "numgrid-generator";

/// Worker and delivery channel of the job in flight.
#[derive(Debug)]
struct Job {
    handle: JoinHandle<()>,
    receiver: Receiver<Batch>,
}

/// Background generator with at most one job in flight.
///
/// Owned by the interactive context; not `Sync` by intent.
#[derive(Debug, Default)]
pub struct Generator {
    job: Option<Job>,
}

impl Generator {
    /// Create an idle generator.
    pub fn new() -> Self {
        Self { job: None }
    }

    /// Whether a job is in flight (started and not yet drained).
    pub fn is_generating(&self) -> bool {
        self.job.is_some()
    }

    /// Start a job for `request`.
    ///
    /// Returns immediately. Returns `false` without doing anything if a job
    /// is already in flight, or if the worker thread could not be spawned.
    pub fn start(&mut self, request: GenerationRequest) -> bool {
        self.spawn(request, generate)
    }

    /// Start a job that runs `work` in place of [`generate`].
    pub(crate) fn spawn(
        &mut self,
        request: GenerationRequest,
        work: fn(GenerationRequest) -> Batch,
    ) -> bool {
        if self.job.is_some() {
            debug!(?request, "Generator busy, ignoring start");
            return false;
        }

        let (sender, receiver) = mpsc::sync_channel(1);
        let spawned = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let batch = work(request);
                debug!(
                    start = request.start(),
                    count = request.count(),
                    produced = batch.len(),
                    boundary = batch.boundary_reached(),
                    "Generation finished"
                );
                if sender.send(batch).is_err() {
                    debug!("Generator dropped before delivery, discarding batch");
                }
            });

        match spawned {
            Ok(handle) => {
                debug!(?request, "Generation started");
                self.job = Some(Job { handle, receiver });
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to spawn generator thread");
                false
            }
        }
    }

    /// Drain a delivered batch without blocking.
    ///
    /// Receiving the batch completes the job and releases the single-flight
    /// lock. So does a worker that died without delivering. Returns `None`
    /// while the job is still computing or when idle.
    pub fn poll(&mut self) -> Option<Batch> {
        let received = self.job.as_ref()?.receiver.try_recv();
        match received {
            Ok(batch) => {
                self.join_worker();
                Some(batch)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join_worker();
                None
            }
        }
    }

    /// Wait up to `timeout` for a delivered batch.
    ///
    /// Blocking counterpart of [`poll`](Self::poll); returns `None`
    /// immediately when no job is in flight.
    pub fn poll_timeout(&mut self, timeout: Duration) -> Option<Batch> {
        let received = self.job.as_ref()?.receiver.recv_timeout(timeout);
        match received {
            Ok(batch) => {
                self.join_worker();
                Some(batch)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.join_worker();
                None
            }
        }
    }

    /// Block until any in-flight job has finished, then release the lock.
    ///
    /// Returns the batch the job delivered, if it was not drained yet, so the
    /// caller decides whether it is still wanted (a window reset drops it).
    ///
    /// Must not be called from the worker thread.
    pub fn idle(&mut self) -> Option<Batch> {
        let job = self.job.take()?;
        if job.handle.join().is_err() {
            error!("Generator thread panicked");
        }
        job.receiver.try_recv().ok()
    }

    /// Join the worker, if any. Releases the single-flight lock.
    fn join_worker(&mut self) {
        if let Some(job) = self.job.take() {
            if job.handle.join().is_err() {
                error!("Generator thread panicked, batch lost");
            }
        }
    }
}

impl Drop for Generator {
    fn drop(&mut self) {
        self.join_worker();
    }
}

/// Run one job synchronously. Worker-thread body.
///
/// Produces up to `count` entries walking from `start`. Stops early, with the
/// boundary sentinel set, when the next value would leave the domain. The
/// result is always ascending.
pub fn generate(request: GenerationRequest) -> Batch {
    let count = request.count() as usize;
    let mut entries = Vec::with_capacity(count);
    let mut next = Some(request.start());
    let mut boundary_reached = false;

    for _ in 0..count {
        let Some(value) = next else {
            boundary_reached = true;
            break;
        };
        entries.push(Entry::compute(value));
        next = match request.direction() {
            Direction::Ascending => value.checked_add(1),
            Direction::Descending if value > MIN_VALUE => Some(value - 1),
            Direction::Descending => None,
        };
    }

    if request.direction() == Direction::Descending {
        entries.reverse();
    }

    Batch::new(request, entries, boundary_reached)
}
