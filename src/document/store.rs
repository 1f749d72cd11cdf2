//! DocumentStore - Abstract remote document collections.

use std::fmt;
use std::sync::Arc;

use super::{CollectionSnapshot, Fields, StoreError, StoredDocument};

/// Callback receiving collection snapshots, or a listener error.
///
/// Invoked on a thread owned by the store; implementations make no promise
/// about which one.
pub type SnapshotListener = Arc<dyn Fn(Result<CollectionSnapshot, StoreError>) + Send + Sync>;

/// Handle for an active collection watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub(crate) u64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch-{}", self.0)
    }
}

/// Abstract remote document storage.
pub trait DocumentStore: Send + Sync {
    /// Add a document and return its store-assigned id.
    fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Get a document by id. Returns None if not found.
    fn get_document(&self, collection: &str, id: &str)
        -> Result<Option<StoredDocument>, StoreError>;

    /// Merge top-level fields into an existing document.
    /// Fails with `StoreError::NotFound` and never creates the document.
    fn update_document(&self, collection: &str, id: &str, fields: Fields)
        -> Result<(), StoreError>;

    /// Delete a document by id. Returns true if it existed.
    fn delete_document(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Read the whole collection.
    fn list_documents(&self, collection: &str) -> Result<CollectionSnapshot, StoreError>;

    /// Observe a collection. The listener first receives the current
    /// snapshot, then a fresh one after every change, until `unwatch`.
    fn watch_collection(
        &self,
        collection: &str,
        listener: SnapshotListener,
    ) -> Result<WatchId, StoreError>;

    /// Stop a watch. Unknown ids are ignored.
    fn unwatch(&self, watch: &WatchId);
}
