//! Completion handle for operations running on a worker thread.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::exercise::ExerciseError;

/// The eventual outcome of a non-blocking store operation.
///
/// Dropping a `Pending` does not cancel the remote call; the result is
/// simply discarded.
#[must_use = "a Pending does nothing unless its outcome is observed"]
pub struct Pending<T> {
    rx: Receiver<Result<T, ExerciseError>>,
}

impl<T: Send + 'static> Pending<T> {
    /// Run `work` on a named thread and hand back its outcome later.
    pub(crate) fn spawn<F>(name: String, work: F) -> Self
    where
        F: FnOnce() -> Result<T, ExerciseError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new().name(name).spawn(move || {
            let _ = tx.send(work());
        });

        match spawned {
            Ok(_) => Self { rx },
            Err(e) => Self::ready(Err(ExerciseError::Transport(format!(
                "failed to start worker: {}",
                e
            )))),
        }
    }

    /// Transform the successful outcome without blocking the caller.
    pub fn map<U, F>(self, f: F) -> Pending<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        Pending::spawn("pending-map".into(), move || self.wait().map(f))
    }
}

impl<T> Pending<T> {
    /// A handle that is already resolved.
    pub fn ready(result: Result<T, ExerciseError>) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(result);
        Self { rx }
    }

    /// Block until the operation completes.
    pub fn wait(self) -> Result<T, ExerciseError> {
        self.rx.recv().unwrap_or_else(|_| Err(abandoned()))
    }

    /// Block for at most `timeout`. Returns None if still in flight.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T, ExerciseError>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(abandoned())),
        }
    }

    /// Take the outcome if it has arrived.
    pub fn try_take(&self) -> Option<Result<T, ExerciseError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(abandoned())),
        }
    }
}

fn abandoned() -> ExerciseError {
    ExerciseError::Transport("operation abandoned before completion".into())
}
