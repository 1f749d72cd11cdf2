use std::sync::mpsc::{channel, Receiver};
use std::sync::Mutex;
use std::time::Duration;

use fitness_journal::{
    ExerciseError, ExerciseRecord, ExerciseStore, InMemoryDocumentStore, Subscription,
};

pub const TIMEOUT: Duration = Duration::from_secs(2);
pub const QUIET: Duration = Duration::from_millis(150);

pub fn new_store() -> ExerciseStore<InMemoryDocumentStore> {
    ExerciseStore::new(InMemoryDocumentStore::new())
}

/// Collects everything a subscription delivers.
pub struct Recorder {
    changes: Receiver<Vec<ExerciseRecord>>,
    errors: Receiver<ExerciseError>,
}

impl Recorder {
    pub fn next(&self) -> Vec<ExerciseRecord> {
        self.changes
            .recv_timeout(TIMEOUT)
            .expect("expected a snapshot notification")
    }

    pub fn next_error(&self) -> ExerciseError {
        self.errors
            .recv_timeout(TIMEOUT)
            .expect("expected an error notification")
    }

    /// Every notification that arrives until the subscription goes quiet.
    pub fn drain(&self) -> Vec<Vec<ExerciseRecord>> {
        let mut seen = Vec::new();
        while let Ok(records) = self.changes.recv_timeout(QUIET) {
            seen.push(records);
        }
        seen
    }

    pub fn is_quiet(&self) -> bool {
        self.changes.recv_timeout(QUIET).is_err()
    }
}

pub fn record(store: &ExerciseStore<InMemoryDocumentStore>) -> (Subscription, Recorder) {
    let (change_tx, changes) = channel();
    let (error_tx, errors) = channel();
    let change_tx = Mutex::new(change_tx);
    let error_tx = Mutex::new(error_tx);

    let subscription = store
        .subscribe(
            move |records: &[ExerciseRecord]| {
                let _ = change_tx.lock().unwrap().send(records.to_vec());
            },
            move |err| {
                let _ = error_tx.lock().unwrap().send(err);
            },
        )
        .unwrap();

    (subscription, Recorder { changes, errors })
}
