//! ExerciseStore - The single point of access to exercise records.
//!
//! Every intent (`create`, `update`, `delete`, `fetch_one`, `list`) returns a
//! `Pending` right away and runs its remote call on a worker thread. The
//! observed record list only changes through `subscribe`: writes are never
//! applied optimistically.

use std::sync::{Arc, Mutex};

use tracing::{debug, trace, warn};

use super::{coerce_weights, ExerciseError, ExerciseRecord};
use crate::config::JournalConfig;
use crate::document::{
    from_stored, CollectionSnapshot, DocumentStore, DocumentsExt, StoreError, StoredDocument,
};
use crate::pending::Pending;
use crate::subscription::{Delivery, Subscription};

/// The locally cached record list and the revision it was built from.
#[derive(Debug, Default)]
struct Cache {
    revision: Option<u64>,
    records: Vec<ExerciseRecord>,
}

/// Mediates between the cached record list and the remote `exercises` collection.
pub struct ExerciseStore<S> {
    client: Arc<S>,
    config: JournalConfig,
    cache: Arc<Mutex<Cache>>,
}

impl<S: DocumentStore + 'static> ExerciseStore<S> {
    pub fn new(client: S) -> Self {
        Self::with_config(client, JournalConfig::default())
    }

    pub fn with_config(client: S, config: JournalConfig) -> Self {
        Self {
            client: Arc::new(client),
            config,
            cache: Arc::new(Mutex::new(Cache::default())),
        }
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// The remote client. Owned by this store.
    pub fn client(&self) -> &S {
        &self.client
    }

    /// The latest snapshot applied by a subscription.
    pub fn records(&self) -> Vec<ExerciseRecord> {
        match self.cache.lock() {
            Ok(cache) => cache.records.clone(),
            Err(poisoned) => poisoned.into_inner().records.clone(),
        }
    }

    /// Revision of the cached snapshot, None before the first one arrives.
    pub fn revision(&self) -> Option<u64> {
        match self.cache.lock() {
            Ok(cache) => cache.revision,
            Err(poisoned) => poisoned.into_inner().revision,
        }
    }

    /// Observe the whole collection.
    ///
    /// `on_change` receives the complete list after every change, starting
    /// with the current contents. Listener failures go to `on_error`; the
    /// cached list is kept as it was. Callbacks for one subscription never
    /// overlap and never go back to an older revision. Do not drop the
    /// returned `Subscription` from inside its own callbacks.
    pub fn subscribe<F, E>(&self, on_change: F, on_error: E) -> Result<Subscription, ExerciseError>
    where
        F: Fn(&[ExerciseRecord]) + Send + Sync + 'static,
        E: Fn(ExerciseError) + Send + Sync + 'static,
    {
        let delivery = Delivery::shared();
        let cache = Arc::clone(&self.cache);
        let listener_delivery = Arc::clone(&delivery);
        let collection = self.config.collection.clone();

        let listener = move |result: Result<CollectionSnapshot, StoreError>| {
            let mut delivery = match listener_delivery.lock() {
                Ok(delivery) => delivery,
                Err(_) => return,
            };
            if !delivery.active {
                return;
            }

            let snapshot = match result {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(collection = %collection, error = %err, "exercise listener failed");
                    on_error(ExerciseError::Subscription(err.to_string()));
                    return;
                }
            };

            if delivery.last_revision.is_some_and(|seen| snapshot.revision <= seen) {
                trace!(revision = snapshot.revision, "dropping stale snapshot");
                return;
            }

            let records = match decode_snapshot(&snapshot) {
                Ok(records) => records,
                Err(err) => {
                    warn!(collection = %collection, error = %err, "undecodable snapshot");
                    on_error(err);
                    return;
                }
            };
            delivery.last_revision = Some(snapshot.revision);

            let mut cache = match cache.lock() {
                Ok(cache) => cache,
                Err(poisoned) => poisoned.into_inner(),
            };
            if cache.revision.map_or(true, |current| snapshot.revision > current) {
                debug!(
                    revision = snapshot.revision,
                    count = records.len(),
                    "applied exercise snapshot"
                );
                cache.revision = Some(snapshot.revision);
                cache.records = records.clone();
            }
            drop(cache);

            on_change(&records);
        };

        let watch = self
            .client
            .watch_collection(&self.config.collection, Arc::new(listener))
            .map_err(|err| {
                warn!(error = %err, "failed to start exercise listener");
                ExerciseError::Subscription(err.to_string())
            })?;
        debug!(%watch, collection = %self.config.collection, "subscribed");

        let client = Arc::clone(&self.client);
        Ok(Subscription::new(
            delivery,
            Box::new(move || {
                client.unwatch(&watch);
                debug!(%watch, "unsubscribed");
            }),
        ))
    }

    /// Add a new record. Resolves to the store-assigned id.
    pub fn create<W: AsRef<str>>(&self, name: &str, raw_weights: &[W]) -> Pending<String> {
        let record = ExerciseRecord {
            id: String::new(),
            name: name.to_string(),
            weights: coerce_weights(raw_weights),
        };
        let client = Arc::clone(&self.client);
        let collection = self.config.collection.clone();

        debug!(name = %record.name, sets = record.weights.len(), "creating exercise");
        Pending::spawn(self.worker_name("create"), move || {
            client
                .documents_in::<ExerciseRecord>(&collection)
                .add(&record)
                .map_err(|err| report("create", &record.id, err))
        })
    }

    /// Replace name and weights of an existing record. Never creates one.
    pub fn update<W: AsRef<str>>(&self, id: &str, name: &str, raw_weights: &[W]) -> Pending<()> {
        if id.is_empty() {
            return Pending::ready(Err(ExerciseError::MissingId));
        }
        let record = ExerciseRecord {
            id: id.to_string(),
            name: name.to_string(),
            weights: coerce_weights(raw_weights),
        };
        let client = Arc::clone(&self.client);
        let collection = self.config.collection.clone();

        debug!(id, sets = record.weights.len(), "updating exercise");
        Pending::spawn(self.worker_name("update"), move || {
            client
                .documents_in::<ExerciseRecord>(&collection)
                .update(&record)
                .map_err(|err| report("update", &record.id, err))
        })
    }

    /// Delete a record. Deleting an unknown id also succeeds.
    pub fn delete(&self, id: &str) -> Pending<()> {
        if id.is_empty() {
            return Pending::ready(Err(ExerciseError::MissingId));
        }
        let id = id.to_string();
        let client = Arc::clone(&self.client);
        let collection = self.config.collection.clone();

        debug!(id = %id, "deleting exercise");
        Pending::spawn(self.worker_name("delete"), move || {
            let existed = client
                .documents_in::<ExerciseRecord>(&collection)
                .delete(&id)
                .map_err(|err| report("delete", &id, err))?;
            if !existed {
                debug!(id = %id, "exercise was already gone");
            }
            Ok(())
        })
    }

    /// Read one record, e.g. to seed an edit form.
    pub fn fetch_one(&self, id: &str) -> Pending<ExerciseRecord> {
        if id.is_empty() {
            return Pending::ready(Err(ExerciseError::MissingId));
        }
        let id = id.to_string();
        let client = Arc::clone(&self.client);
        let collection = self.config.collection.clone();

        Pending::spawn(self.worker_name("fetch"), move || {
            let stored = client
                .get_document(&collection, &id)
                .map_err(|err| report("fetch", &id, err))?
                .ok_or_else(|| ExerciseError::NotFound { id: id.clone() })?;
            decode(&stored)
        })
    }

    /// One-off read of the whole collection, in store order.
    pub fn list(&self) -> Pending<Vec<ExerciseRecord>> {
        let client = Arc::clone(&self.client);
        let collection = self.config.collection.clone();

        Pending::spawn(self.worker_name("list"), move || {
            let snapshot = client
                .list_documents(&collection)
                .map_err(|err| report("list", "", err))?;
            decode_snapshot(&snapshot)
        })
    }

    fn worker_name(&self, operation: &str) -> String {
        format!("{}-{}", self.config.worker_name, operation)
    }
}

fn report(operation: &str, id: &str, err: StoreError) -> ExerciseError {
    warn!(operation, id, error = %err, "exercise operation failed");
    ExerciseError::from(err)
}

fn decode(stored: &StoredDocument) -> Result<ExerciseRecord, ExerciseError> {
    from_stored(stored).map_err(|err| ExerciseError::Malformed {
        id: stored.id.clone(),
        message: err.to_string(),
    })
}

fn decode_snapshot(snapshot: &CollectionSnapshot) -> Result<Vec<ExerciseRecord>, ExerciseError> {
    snapshot.documents.iter().map(decode).collect()
}
