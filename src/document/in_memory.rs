//! InMemoryDocumentStore - HashMap-backed document store for testing and development.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use event_emitter_rs::EventEmitter;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::{
    CollectionSnapshot, DocumentStore, Fields, SnapshotListener, StoreError, StoredDocument,
    WatchId,
};

const AUTO_ID_LEN: usize = 20;

/// Operations that can be made to fail with `fail_next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Add,
    Get,
    Update,
    Delete,
    List,
    Watch,
}

#[derive(Default)]
struct Collection {
    revision: u64,
    documents: BTreeMap<String, Fields>,
}

impl Collection {
    fn snapshot(&self, name: &str) -> CollectionSnapshot {
        CollectionSnapshot {
            collection: name.to_string(),
            revision: self.revision,
            documents: self
                .documents
                .iter()
                .map(|(id, fields)| StoredDocument {
                    id: id.clone(),
                    fields: fields.clone(),
                })
                .collect(),
        }
    }
}

struct Watch {
    collection: String,
    event: String,
}

/// Wire form of a watch notification.
#[derive(Serialize, Deserialize)]
enum WatchMessage {
    Snapshot(CollectionSnapshot),
    Error(String),
}

/// In-memory document store.
///
/// Documents are kept per collection, ordered by id. Watch notifications go
/// through an `EventEmitter`, so listeners run on emitter threads and two
/// notifications may arrive out of order; use `CollectionSnapshot::revision`
/// to order them. Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
    emitter: Arc<Mutex<EventEmitter>>,
    watches: Arc<Mutex<HashMap<WatchId, Watch>>>,
    next_watch: Arc<AtomicU64>,
    failures: Arc<Mutex<HashMap<StoreOperation, VecDeque<String>>>>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
            watches: Arc::new(Mutex::new(HashMap::new())),
            next_watch: Arc::new(AtomicU64::new(1)),
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Make the next call of `operation` fail with `StoreError::Unavailable(message)`.
    /// Calls queue up: injecting twice fails the next two calls.
    pub fn fail_next(&self, operation: StoreOperation, message: impl Into<String>) {
        if let Ok(mut failures) = self.failures.lock() {
            failures
                .entry(operation)
                .or_default()
                .push_back(message.into());
        }
    }

    /// Deliver a listener error to every watcher of `collection`.
    pub fn broadcast_error(
        &self,
        collection: &str,
        message: impl Into<String>,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&WatchMessage::Error(message.into()))?;
        let events = self.events_for(collection)?;
        self.emit_all(&events, &payload)
    }

    /// Number of active watches on `collection`.
    pub fn watcher_count(&self, collection: &str) -> usize {
        self.watches
            .lock()
            .map(|watches| {
                watches
                    .values()
                    .filter(|w| w.collection == collection)
                    .count()
            })
            .unwrap_or(0)
    }

    fn take_failure(&self, operation: StoreOperation) -> Result<(), StoreError> {
        let mut failures = self
            .failures
            .lock()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        match failures.get_mut(&operation).and_then(|queue| queue.pop_front()) {
            Some(message) => Err(StoreError::Unavailable(message)),
            None => Ok(()),
        }
    }

    fn new_id() -> String {
        Uuid::new_v4().simple().to_string()[..AUTO_ID_LEN].to_string()
    }

    fn events_for(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let watches = self
            .watches
            .lock()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        Ok(watches
            .values()
            .filter(|w| w.collection == collection)
            .map(|w| w.event.clone())
            .collect())
    }

    fn emit_all(&self, events: &[String], payload: &str) -> Result<(), StoreError> {
        if events.is_empty() {
            return Ok(());
        }
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        for event in events {
            // Listener threads are detached.
            let _ = emitter.emit(event, payload.to_string());
        }
        Ok(())
    }

    /// Apply a write under the collection lock, bump the revision, and
    /// notify watchers with the resulting snapshot.
    fn write<T>(
        &self,
        collection: &str,
        apply: impl FnOnce(&mut Collection) -> Result<(T, bool), StoreError>,
    ) -> Result<T, StoreError> {
        let (value, snapshot) = {
            let mut collections = self
                .collections
                .write()
                .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
            let entry = collections.entry(collection.to_string()).or_default();

            let (value, changed) = apply(entry)?;
            if !changed {
                return Ok(value);
            }
            entry.revision += 1;
            (value, entry.snapshot(collection))
        };

        // The write is committed; a failed notification must not undo it.
        if let Err(err) = self.notify(&snapshot) {
            warn!(collection, error = %err, "failed to notify watchers");
        }
        Ok(value)
    }

    fn notify(&self, snapshot: &CollectionSnapshot) -> Result<(), StoreError> {
        let events = self.events_for(&snapshot.collection)?;
        if events.is_empty() {
            return Ok(());
        }
        let payload = serde_json::to_string(&WatchMessage::Snapshot(snapshot.clone()))?;
        self.emit_all(&events, &payload)
    }

    /// Drop a watch's event and its listener from the emitter.
    fn remove_event(&self, event: &str) {
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.listeners.remove(event);
        }
    }

    fn read_snapshot(&self, collection: &str) -> Result<CollectionSnapshot, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        Ok(match collections.get(collection) {
            Some(c) => c.snapshot(collection),
            None => CollectionSnapshot {
                collection: collection.to_string(),
                revision: 0,
                documents: Vec::new(),
            },
        })
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        self.take_failure(StoreOperation::Add)?;

        self.write(collection, |c| {
            let mut id = Self::new_id();
            while c.documents.contains_key(&id) {
                id = Self::new_id();
            }
            c.documents.insert(id.clone(), fields);
            Ok((id, true))
        })
    }

    fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        self.take_failure(StoreOperation::Get)?;

        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        Ok(collections
            .get(collection)
            .and_then(|c| c.documents.get(id))
            .map(|fields| StoredDocument {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        self.take_failure(StoreOperation::Update)?;

        self.write(collection, |c| {
            let existing = c
                .documents
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;
            existing.extend(fields);
            Ok(((), true))
        })
    }

    fn delete_document(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.take_failure(StoreOperation::Delete)?;

        self.write(collection, |c| {
            let existed = c.documents.remove(id).is_some();
            Ok((existed, existed))
        })
    }

    fn list_documents(&self, collection: &str) -> Result<CollectionSnapshot, StoreError> {
        self.take_failure(StoreOperation::List)?;
        self.read_snapshot(collection)
    }

    fn watch_collection(
        &self,
        collection: &str,
        listener: SnapshotListener,
    ) -> Result<WatchId, StoreError> {
        self.take_failure(StoreOperation::Watch)?;

        let watch_id = WatchId(self.next_watch.fetch_add(1, Ordering::SeqCst));
        let event = format!("{}#{}", collection, watch_id.0);

        {
            let mut emitter = self
                .emitter
                .lock()
                .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

            // Listener ids are not needed: one event per watch.
            let _ = emitter.on(&event, move |payload: String| {
                match serde_json::from_str::<WatchMessage>(&payload) {
                    Ok(WatchMessage::Snapshot(snapshot)) => listener(Ok(snapshot)),
                    Ok(WatchMessage::Error(message)) => {
                        listener(Err(StoreError::Unavailable(message)))
                    }
                    Err(e) => listener(Err(StoreError::Serde(e.to_string()))),
                }
            });
        }

        let registered = self
            .watches
            .lock()
            .map(|mut watches| {
                watches.insert(
                    watch_id,
                    Watch {
                        collection: collection.to_string(),
                        event: event.clone(),
                    },
                );
            })
            .map_err(|_| StoreError::Storage("lock poisoned".into()));
        if let Err(err) = registered {
            self.remove_event(&event);
            return Err(err);
        }

        let initial = self
            .read_snapshot(collection)
            .and_then(|snapshot| {
                serde_json::to_string(&WatchMessage::Snapshot(snapshot)).map_err(StoreError::from)
            })
            .and_then(|payload| self.emit_all(&[event], &payload));
        if let Err(err) = initial {
            self.unwatch(&watch_id);
            return Err(err);
        }

        Ok(watch_id)
    }

    fn unwatch(&self, watch: &WatchId) {
        let removed = match self.watches.lock() {
            Ok(mut watches) => watches.remove(watch),
            Err(_) => None,
        };

        if let Some(removed) = removed {
            self.remove_event(&removed.event);
        }
    }
}
